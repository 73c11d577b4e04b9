use std::process;

use clap::Parser;

use finex::{
    cli::{self, output, Cli},
    init,
};

fn main() {
    let cli = Cli::parse();
    init();

    if let Err(err) = cli::run(cli) {
        output::error(err);
        process::exit(1);
    }
}
