use std::{env, process};

use silhouette::RecordReader;

fn dump(file: &str) -> silhouette::GdsResult<()> {
    let bytes = std::fs::read(file)?;
    println!("{}", file);
    for record in RecordReader::new(&bytes) {
        println!("{}", record?);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let mut args = env::args();
    args.next();
    if args.len() == 0 {
        eprintln!("usage: silhouette <file.gds>...");
        process::exit(1);
    }
    for file in args {
        if let Err(err) = dump(&file) {
            eprintln!("dump file {} error: {}", file, err);
        }
    }
}
