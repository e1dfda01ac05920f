mod find;
mod offsets;

const USAGE: &str = "\
A tool for debugging UTF-16 regex searches on the command line.

USAGE:
    regex-utf16-cli <command> ...

COMMANDS:
    find     Search a haystack and print UTF-16 spans for every group.
    offsets  Print how UTF-16 offsets map onto UTF-8 byte offsets.

Set RUST_LOG to one of error, warn, info, debug or trace to see what the
regex cache and the search routines are doing.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "find" => find::run(p),
        "offsets" => offsets::run(p),
        unk => anyhow::bail!("unrecognized command '{unk}'"),
    }
}
