use std::io::{stdout, Write};

use {
    anyhow::Context,
    lexopt::Parser,
    regex_utf16::{Match, RegexCache},
};

use crate::{
    args::{self, input::Haystack},
    util::{self, Table},
};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &str = "\
Executes a single search and prints the span of every capture group.

Spans of text haystacks are in UTF-16 code units, exactly as the library
reports them. Groups that did not participate in the match are printed as
'none'. The regex is obtained through a cache, just like the free functions
of the library do it.

USAGE:
    regex-utf16-cli find [options] <pattern> <haystack>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = args::common::Config::default();
    let mut input = args::input::Config::default();
    let mut options = args::options::Config::default();
    let mut window = args::window::Config::default();
    args::configure(
        p,
        USAGE,
        &mut [&mut common, &mut input, &mut options, &mut window],
    )?;

    let pattern = input.pattern()?;
    let haystack = input.haystack()?;
    let (start, length) = window.get(haystack.len());

    let cache = RegexCache::new(1);
    let mut table = Table::empty();
    let (re, time) = util::timeitr(|| {
        cache
            .find_or_create(&pattern, options.options())
            .context("failed to compile regex")
    })?;
    table.add("build regex time", time);
    table.add("encoding", re.encoding());
    table.add("captures", re.captures_len());

    let (result, time) = util::timeit(|| match haystack {
        Haystack::Text(ref units) => re.find_in(units, start, length),
        Haystack::Bytes(ref bytes) => re.find_bytes_in(bytes, start, length),
    });
    let m = result.context("search failed")?;
    table.add("search time", time);
    table.add("window", start..start.saturating_add(length));
    if common.table() {
        table.print(stdout())?;
    }
    print_match(&common, &haystack, &m)
}

fn print_match(
    common: &args::common::Config,
    haystack: &Haystack,
    m: &Match,
) -> anyhow::Result<()> {
    let mut out = stdout().lock();
    if !m.is_match() {
        writeln!(out, "no match")?;
        return Ok(());
    }
    for (i, group) in m.iter().enumerate() {
        match group {
            None => writeln!(out, "{i}: none")?,
            Some(span) if common.quiet => writeln!(out, "{i}: {span:?}")?,
            Some(span) => writeln!(
                out,
                "{i}: {span:?} {}",
                haystack.show(span.range()),
            )?,
        }
    }
    Ok(())
}
