use std::io::{stdout, Write};

use {
    anyhow::Context,
    lexopt::Parser,
    regex_utf16::{encode, Encoding, Utf16Cursor},
};

use crate::args::{self, input::Haystack};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &str = "\
Prints every UTF-16 code unit of a haystack next to the UTF-8 byte offset it
starts at.

This is the same translation that searches use to map windows and spans
between the caller's code units and the engine's bytes.

USAGE:
    regex-utf16-cli offsets <haystack>

OPTIONS:
%options%
";

    let mut input = args::input::Config::only_haystack();
    args::configure(p, USAGE, &mut [&mut input])?;
    let units = match input.haystack()? {
        Haystack::Text(units) => units,
        Haystack::Bytes(_) => anyhow::bail!("offsets requires a text haystack"),
    };
    let buf = encode(&units, Encoding::Utf8).context("failed to encode")?;

    let mut out = stdout().lock();
    let mut cursor = Utf16Cursor::start();
    for (unit, &value) in units.iter().enumerate() {
        // The second half of a pair has no byte offset of its own.
        if cursor.unit() > unit {
            writeln!(out, "{unit:>6}  {value:04X}  -")?;
            continue;
        }
        let next = cursor.advance_units(&buf, 1);
        writeln!(
            out,
            "{unit:>6}  {value:04X}  {}..{}",
            cursor.byte(),
            next.byte(),
        )?;
        cursor = next;
    }
    writeln!(out, "{:>6}  end   {}", units.len(), buf.len())?;
    Ok(())
}
