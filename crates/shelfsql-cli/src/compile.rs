use crate::cli::CompileArgs;
use crate::config;
use anyhow::Context;
use shelfsql::{QueryGenerator, QueryRequest};
use std::io::{Read, Write};

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let generator = QueryGenerator::new(config::resolve(args.config.as_deref(), args.dialect)?);
    tracing::debug!(
        dialect = generator.config().dialect.name(),
        max_depth = generator.config().max_depth,
        "generator configured"
    );
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.files.is_empty() {
        let input = read_stdin()?;
        compile_source("stdin", &input, &generator, args.inline, &mut out)?;
    } else {
        for file in &args.files {
            let (name, input) = if file.as_os_str() == "-" {
                ("stdin".to_string(), read_stdin()?)
            } else {
                let content = std::fs::read_to_string(file)
                    .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
                (file.display().to_string(), content)
            };
            compile_source(&name, &input, &generator, args.inline, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
    if buf.trim().is_empty() {
        anyhow::bail!("no request provided (pass files or pipe JSON to stdin)");
    }
    Ok(buf)
}

/// Compile every request in `input`, one output line each.
fn compile_source(
    name: &str,
    input: &str,
    generator: &QueryGenerator,
    inline: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let requests =
        QueryRequest::from_json_many(input).with_context(|| format!("failed to parse {name}"))?;
    if requests.is_empty() {
        anyhow::bail!("no requests found in {name}");
    }

    for (idx, request) in requests.iter().enumerate() {
        let stmt = generator.generate(request).with_context(|| {
            format!("{name}:request{}: {} on {}", idx + 1, request.kind, request.table)
        })?;
        if inline {
            writeln!(out, "{}", stmt.to_inline_sql())?;
        } else {
            writeln!(out, "{}", serde_json::to_string(&stmt)?)?;
        }
    }
    Ok(())
}
