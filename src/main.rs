use std::{env, fs, path::PathBuf, process, time::Instant};

use fool::{
    compile, display_error,
    vm::{instructions::to_assembly, vm::VirtualMachine},
};

struct Options {
    source: PathBuf,
    asm: Option<PathBuf>,
    run: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut source = None;
    let mut asm = None;
    let mut run = true;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--asm" => match iter.next() {
                Some(path) => asm = Some(PathBuf::from(path)),
                None => return Err(String::from("--asm needs an output path")),
            },
            "--no-run" => run = false,
            _ if source.is_none() => source = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument `{}`", arg)),
        }
    }

    let source = source.ok_or_else(|| String::from("no source file given"))?;
    Ok(Options { source, asm, run })
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("usage: fool <file.fool> [--asm <out>] [--no-run]");
            process::exit(2);
        }
    };

    let file_name = options
        .source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| options.source.to_string_lossy().to_string());

    let file_contents = match fs::read_to_string(&options.source) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", options.source.display(), error);
            process::exit(2);
        }
    };

    let start = Instant::now();
    let code = match compile(&file_contents, Some(file_name.clone())) {
        Ok(code) => code,
        Err(errors) => {
            for error in &errors {
                display_error(error, &file_name, &file_contents);
            }
            println!("{} error(s) found", errors.len());
            process::exit(1);
        }
    };

    println!("Compiled in {:?}", start.elapsed());

    let asm_path = options
        .asm
        .unwrap_or_else(|| options.source.with_extension("asm"));
    if let Err(error) = fs::write(&asm_path, to_assembly(&code)) {
        eprintln!("Failed to write {}: {}", asm_path.display(), error);
        process::exit(2);
    }

    println!("Wrote {}", asm_path.display());

    if !options.run {
        return;
    }

    let run_start = Instant::now();
    let result = VirtualMachine::load(&code).and_then(|mut machine| machine.run());

    match result {
        Ok(result) => {
            for value in &result.output {
                println!("{}", value);
            }
            println!("Ran in {:?}", run_start.elapsed());
            match result.top {
                Some(top) => println!("Result: {}", top),
                None => println!("Result: <empty stack>"),
            }
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}
