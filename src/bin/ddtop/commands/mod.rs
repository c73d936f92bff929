mod check;

use check::run_check;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Check(args) => run_check(args, ctx),
    }
}
