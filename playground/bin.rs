mod dct;
mod plot;
mod util;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.get(1).expect("missing program name");

    match program.as_str() {
        "dct-spectrum" => dct::spectrum::run(args.get(2).expect("missing file name")),
        "dct-sweep" => dct::sweep::run(args.get(2).expect("missing file name")),
        _ => panic!("unknown program"),
    }
}
