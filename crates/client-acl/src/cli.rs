//! Command line surface.
//!
//! The fixed options are declared with the clap derive; the match and action
//! options are generated from [`FIELD_SPECS`] so the option table and the
//! decoders cannot drift apart.

use crate::defaults::{
    help_text, DEFAULT_CLIENT_NAME, DEFAULT_LOG_LEVEL, DEFAULT_RPC_ADDR, DEFAULT_RULE,
    RPC_ADDR_ENV,
};
use crate::driver::Mode;
use crate::fields::{FieldKey, FieldSpec, FIELD_SPECS};
use clap::{Arg, ArgAction, ArgMatches, Command, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;

/// Operation selected by the positional verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Verb {
    Delete,
    List,
}

/// Adds, deletes or lists Policy ACL flows.
#[derive(Parser, Debug)]
#[command(name = "client_acl")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Delete or list flows instead of adding them
    #[arg(value_enum, ignore_case = true)]
    pub verb: Option<Verb>,

    /// Flow table service address
    #[arg(long, env = RPC_ADDR_ENV, default_value = DEFAULT_RPC_ADDR)]
    pub rpc_addr: String,

    /// Name to register with the flow table service
    #[arg(long, default_value = DEFAULT_CLIENT_NAME)]
    pub client_name: String,

    /// Dry run against an empty in-process flow table instead of the service.
    /// The table lasts only for this run, so list and delete find nothing
    #[arg(long)]
    pub simulate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        match self.verb {
            None => Mode::Add,
            Some(Verb::Delete) => Mode::Delete,
            Some(Verb::List) => Mode::List,
        }
    }
}

/// A parsed command line: fixed options plus field arguments in the order given.
#[derive(Debug)]
pub struct Invocation {
    pub cli: Cli,
    pub fields: Vec<(FieldKey, String)>,
}

fn field_arg(spec: &FieldSpec) -> Arg {
    let arg = Arg::new(spec.long)
        .long(spec.long)
        .help(spec.help)
        .help_heading(spec.heading);
    match spec.value_name {
        Some(value_name) => arg
            .value_name(value_name)
            .value_parser(clap::value_parser!(String))
            .action(ArgAction::Append),
        None => arg.action(ArgAction::SetTrue),
    }
}

/// Builds the full command, including the generated field options.
pub fn command() -> Command {
    Cli::command()
        .args(FIELD_SPECS.iter().map(field_arg))
        .after_help(help_text(&DEFAULT_RULE))
}

fn collect_fields(matches: &ArgMatches) -> Vec<(FieldKey, String)> {
    let mut indexed = Vec::new();
    let mut flags = Vec::new();

    for spec in FIELD_SPECS {
        if spec.is_flag() {
            if matches.get_flag(spec.long) {
                flags.push((spec.key, String::new()));
            }
            continue;
        }
        if let (Some(values), Some(indices)) = (
            matches.get_many::<String>(spec.long),
            matches.indices_of(spec.long),
        ) {
            indexed.extend(
                indices
                    .zip(values)
                    .map(|(index, value)| (index, spec.key, value.clone())),
            );
        }
    }

    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, key, value)| (key, value))
        .chain(flags)
        .collect()
}

/// Parses `args` (including the program name).
pub fn parse_from<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    let fields = collect_fields(&matches);
    Ok(Invocation { cli, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn test_every_field_has_an_option() {
        let command = command();
        for spec in FIELD_SPECS {
            assert!(
                command.get_arguments().any(|arg| arg.get_long() == Some(spec.long)),
                "missing --{}",
                spec.long
            );
        }
    }

    #[test]
    fn test_help_lists_defaults() {
        let help = command().render_long_help().to_string();
        assert!(help.contains("Default values:"));
        assert!(help.contains("DESTMAC   = 0001.0305.0709"));
        assert!(help.contains("L2 Qualifiers"));
        assert!(help.contains("--outtunnelport"));
    }

    #[test]
    fn test_no_arguments_adds_defaults() {
        let invocation = parse_from(["client_acl", "--rpc-addr", "10.0.0.1:1"]).unwrap();
        assert_eq!(invocation.cli.mode(), Mode::Add);
        assert_eq!(invocation.cli.rpc_addr, "10.0.0.1:1");
        assert_eq!(invocation.cli.client_name, DEFAULT_CLIENT_NAME);
        assert!(invocation.fields.is_empty());
    }

    #[test]
    fn test_fields_keep_command_line_order() {
        let invocation = parse_from([
            "client_acl",
            "--srcip4pfx",
            "24",
            "--discard",
            "--srcip4",
            "10.0.0.1",
            "--count",
            "5",
            "--srcip4pfx",
            "16",
        ])
        .unwrap();
        assert_eq!(
            invocation.fields,
            vec![
                (FieldKey::SourceIp4Prefix, "24".to_string()),
                (FieldKey::SourceIp4, "10.0.0.1".to_string()),
                (FieldKey::Count, "5".to_string()),
                (FieldKey::SourceIp4Prefix, "16".to_string()),
                (FieldKey::Discard, String::new()),
            ]
        );
    }

    #[test]
    fn test_verb_ignores_case() {
        let invocation = parse_from(["client_acl", "LIST", "--count", "0"]).unwrap();
        assert_eq!(invocation.cli.mode(), Mode::List);
        let invocation = parse_from(["client_acl", "Delete"]).unwrap();
        assert_eq!(invocation.cli.mode(), Mode::Delete);
    }

    #[test]
    fn test_unknown_verb_rejected() {
        assert!(parse_from(["client_acl", "modify"]).is_err());
    }

    #[test]
    fn test_simulate_flag() {
        let invocation = parse_from(["client_acl", "--simulate", "-l", "debug"]).unwrap();
        assert!(invocation.cli.simulate);
        assert_eq!(invocation.cli.log_level, "debug");
    }

    #[test]
    fn test_simulate_help_marks_dry_run() {
        let help = command().render_long_help().to_string();
        assert!(help.contains("Dry run"));
    }
}
