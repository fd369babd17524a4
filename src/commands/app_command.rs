use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "qrfeedz")]
#[command(about = "QR Feedz schema and seeding toolkit")]
#[command(version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: AppCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Drop every table, install the schema and the foundation data
    Fresh {
        /// Also seed randomised test tenants
        #[arg(long, visible_alias = "seed")]
        test: bool,
        /// Seeder to run afterwards (croc-rock, CrocRockSeeder, ...)
        #[arg(long, value_name = "NAME", value_parser = NonEmptyStringValueParser::new())]
        seeder: Option<String>,
    },

    /// Apply pending migrations
    Migrate,

    /// Run one seeder (foundation, test, croc-rock, roche-town-hall)
    Seed(SeedArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SeedArgs {
    #[arg(
        long,
        value_name = "NAME",
        value_parser = NonEmptyStringValueParser::new(),
        conflicts_with = "name",
        required_unless_present = "name"
    )]
    class: Option<String>,

    #[arg(value_name = "NAME", value_parser = NonEmptyStringValueParser::new())]
    name: Option<String>,
}

impl SeedArgs {
    /// `--class=X` or the bare `X`; clap guarantees exactly one.
    pub fn class(&self) -> &str {
        self.class.as_deref().or(self.name.as_deref()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<AppCommand, clap::Error> {
        Cli::try_parse_from(std::iter::once("qrfeedz").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn fresh_flags() {
        assert_eq!(
            parse(&["fresh"]).unwrap(),
            AppCommand::Fresh {
                test: false,
                seeder: None
            }
        );
        assert_eq!(
            parse(&["fresh", "--test", "--seeder=CrocRock"]).unwrap(),
            AppCommand::Fresh {
                test: true,
                seeder: Some("CrocRock".to_string())
            }
        );
        assert_eq!(
            parse(&["fresh", "--seed", "--seeder", "roche-town-hall"]).unwrap(),
            AppCommand::Fresh {
                test: true,
                seeder: Some("roche-town-hall".to_string())
            }
        );
        assert!(parse(&["fresh", "--force"]).is_err());
        assert!(parse(&["fresh", "--seeder"]).is_err());
        assert!(parse(&["fresh", "--seeder="]).is_err());
    }

    #[test]
    fn seed_class_forms() {
        for args in [
            &["seed", "--class=CrocRock"][..],
            &["seed", "--class", "CrocRock"][..],
            &["seed", "CrocRock"][..],
        ] {
            match parse(args).unwrap() {
                AppCommand::Seed(seed) => assert_eq!(seed.class(), "CrocRock"),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(parse(&["seed"]).is_err());
        assert!(parse(&["seed", "--class"]).is_err());
        assert!(parse(&["seed", "--class=CrocRock", "RocheTownHall"]).is_err());
        assert!(parse(&["seed", "CrocRock", "junk"]).is_err());
    }

    #[test]
    fn other_commands() {
        assert_eq!(parse(&["migrate"]).unwrap(), AppCommand::Migrate);
        assert!(parse(&["migrate", "--step=1"]).is_err());
        assert!(parse(&["db:wipe"]).is_err());

        let help = parse(&["help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(!help.use_stderr());
        assert!(parse(&[]).unwrap_err().use_stderr());
    }
}
