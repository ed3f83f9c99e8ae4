use std::env;

use anyhow::{bail, Context, Result};
use chess_rules::perft::perf_test;

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let (Some(depth), Some(expected)) = (args.get(1), args.get(2)) else {
        bail!("Usage: perft-debug <depth> <expected>");
    };
    let depth: usize = depth
        .parse()
        .with_context(|| format!("Invalid depth '{depth}'"))?;
    let expected: usize = expected
        .parse()
        .with_context(|| format!("Invalid node count '{expected}'"))?;
    if perf_test(depth, expected, true)? {
        Ok(())
    } else {
        bail!("Node count at depth {depth} doesn't match {expected}")
    }
}
