// src/main.rs
use std::env;
use std::fs;
use std::process;

use hornlog::Runtime;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: hornlog <file.pl> [--query \"goal.\"]");
        process::exit(1);
    }
    let filename = &args[1];
    let query = args
        .iter()
        .position(|arg| arg == "--query" || arg == "-q")
        .and_then(|index| args.get(index + 1));

    let source = fs::read_to_string(filename).unwrap_or_else(|err| {
        eprintln!("Failed to read file '{}': {}", filename, err);
        process::exit(1);
    });

    let mut runtime = Runtime::new();
    if let Err(err) = runtime.consult(&source) {
        eprintln!("{}", err);
        process::exit(1);
    }
    // Directives may have written output already.
    print!("{}", runtime.take_output());

    if let Some(query) = query {
        match runtime.query(query) {
            Ok(solutions) => {
                let mut any = false;
                for solution in solutions {
                    any = true;
                    if solution.is_empty() {
                        println!("true.");
                    } else {
                        for (name, value) in solution.iter() {
                            println!("{} = {}", name, value);
                        }
                    }
                }
                if !any {
                    println!("false.");
                }
            }
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
        print!("{}", runtime.take_output());
    }
}
