use shelfsql::Dialect;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Compile,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Compile(CompileArgs),
}

#[derive(Debug, Clone, Default)]
pub struct CompileArgs {
    /// Explicit `--config`; otherwise `shelfsql.toml` is used when present.
    pub config: Option<PathBuf>,
    pub dialect: Option<Dialect>,
    pub inline: bool,
    pub verbose: bool,
    pub files: Vec<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "help" => match it.next().map(|s| s.as_str()) {
            None => Ok(Command::Help(HelpTopic::Root)),
            Some("compile") => Ok(Command::Help(HelpTopic::Compile)),
            Some(other) => anyhow::bail!("unknown help topic: {other}"),
        },
        "compile" => parse_compile(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_dialect(value: &str) -> anyhow::Result<Dialect> {
    Dialect::from_name(value)
        .ok_or_else(|| anyhow::anyhow!("unknown dialect: {value} (expected mysql or ansi)"))
}

fn parse_compile<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut args = CompileArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Compile)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                args.config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                args.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--dialect" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--dialect requires a value");
                };
                args.dialect = Some(parse_dialect(v)?);
            }
            _ if token.starts_with("--dialect=") => {
                args.dialect = Some(parse_dialect(token.trim_start_matches("--dialect="))?);
            }
            "--inline" => args.inline = true,
            "-v" | "--verbose" => args.verbose = true,
            _ if token.starts_with('-') && token != "-" => {
                anyhow::bail!("unknown option: {token}")
            }
            _ => args.files.push(PathBuf::from(token)),
        }
    }

    Ok(Command::Compile(args))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
shelfsql - compile JSON query requests to parameterized SQL

USAGE:
  shelfsql <COMMAND> [OPTIONS]

COMMANDS:
  compile       Compile query requests to {{\"query\", \"values\"}} JSON
  help          Show help for a command

Run `shelfsql <command> --help` for more."
            );
        }
        HelpTopic::Compile => {
            println!(
                "\
USAGE:
  shelfsql compile [OPTIONS] [FILE...]

Reads one JSON query request, or an array of them, from each FILE
(stdin when no FILE is given) and prints one compiled statement per line.

OPTIONS:
  --config <PATH>     Config file (default: shelfsql.toml when present)
  --dialect <NAME>    Identifier quoting: mysql (default) or ansi
  --inline            Print SQL with values substituted (debugging only)
  -v, --verbose       Log generated SQL to stderr
  -h, --help          Show this help

REQUEST:
  {{\"kind\": \"select\", \"table\": \"books\",
   \"fieldsToSelect\": [\"title\"],
   \"where\": {{\"author\": {{\"op\": \"CONTAINS\", \"value\": \"Doe\"}}}},
   \"pagination\": {{\"offset\": 0, \"limit\": 10}}}}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("shelfsql")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_args_shows_help() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_compile_with_files() {
        let cmd = parse_args(&args(&[
            "compile",
            "--config",
            "conf/shelfsql.toml",
            "--dialect",
            "ansi",
            "--inline",
            "a.json",
            "b.json",
        ]))
        .unwrap();
        let Command::Compile(compile) = cmd else {
            panic!("expected compile");
        };

        assert_eq!(compile.config, Some(PathBuf::from("conf/shelfsql.toml")));
        assert_eq!(compile.dialect, Some(Dialect::Ansi));
        assert!(compile.inline);
        assert!(!compile.verbose);
        assert_eq!(
            compile.files,
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
    }

    #[test]
    fn parse_equals_forms() {
        let cmd = parse_args(&args(&["compile", "--config=x.toml", "--dialect=mysql", "-v"]))
            .unwrap();
        let Command::Compile(compile) = cmd else {
            panic!("expected compile");
        };
        assert_eq!(compile.config, Some(PathBuf::from("x.toml")));
        assert_eq!(compile.dialect, Some(Dialect::MySql));
        assert!(compile.verbose);
        assert!(compile.files.is_empty());
    }

    #[test]
    fn compile_help() {
        let cmd = parse_args(&args(&["compile", "--help"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Compile)));
        let cmd = parse_args(&args(&["help", "compile"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Compile)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&["compile", "--dialect", "oracle"])).is_err());
        assert!(parse_args(&args(&["compile", "--config"])).is_err());
        assert!(parse_args(&args(&["compile", "--pretty"])).is_err());
    }
}
