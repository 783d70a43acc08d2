// SPDX-License-Identifier: MPL-2.0
use iced_stories::app::{self, Flags};

const HELP: &str = "\
IcedStories - ephemeral image stories

USAGE:
  iced_stories [OPTIONS]

OPTIONS:
  --lang <id>          UI language (e.g. en-US, es)
  --data-dir <path>    Directory holding the stored stories
  --config-dir <path>  Directory holding settings.toml
  -h, --help           Print this help

ENVIRONMENT:
  RUST_LOG                 Log filter (default: iced_stories=info)
  ICED_STORIES_DATA_DIR    Data directory when --data-dir is not given
  ICED_STORIES_CONFIG_DIR  Config directory when --config-dir is not given
";

fn parse_flags(mut args: pico_args::Arguments) -> Result<Option<Flags>, pico_args::Error> {
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::UnusedArgsLeft(
            rest.iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
        ));
    }

    Ok(Some(flags))
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iced_stories=info".into()),
        )
        .init();

    let flags = match parse_flags(pico_args::Arguments::from_env()) {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    app::run(flags)
}
