use std::fmt;

use anstream::ColorChoice;
use jiff::Timestamp;
use owo_colors::OwoColorize;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::{Directive, FromEnvError};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use archbench_static::EnvVars;

/// The style of an archbench logging line.
#[derive(Debug, Clone, Copy)]
pub struct ArchbenchFormat {
    pub display_timestamp: bool,
    pub display_level: bool,
    /// Show the module the event was emitted from.
    pub display_target: bool,
}

impl Default for ArchbenchFormat {
    /// Show the level and the message.
    fn default() -> Self {
        Self {
            display_timestamp: false,
            display_level: true,
            display_target: false,
        }
    }
}

/// See <https://docs.rs/tracing-subscriber/0.3.18/src/tracing_subscriber/fmt/format/mod.rs.html#1026-1156>
impl<S, N> FormatEvent<S, N> for ArchbenchFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if self.display_timestamp {
            if ansi {
                write!(writer, "{} ", Timestamp::now().dimmed())?;
            } else {
                write!(writer, "{} ", Timestamp::now())?;
            }
        }

        if self.display_level {
            let level = meta.level();
            // Same colors as tracing
            if ansi {
                match *level {
                    tracing::Level::TRACE => write!(writer, "{} ", level.purple())?,
                    tracing::Level::DEBUG => write!(writer, "{} ", level.blue())?,
                    tracing::Level::INFO => write!(writer, "{} ", level.green())?,
                    tracing::Level::WARN => write!(writer, "{} ", level.yellow())?,
                    tracing::Level::ERROR => write!(writer, "{} ", level.red())?,
                }
            } else {
                write!(writer, "{level} ")?;
            }
        }

        if self.display_target {
            if ansi {
                write!(writer, "{} ", meta.target().dimmed())?;
            } else {
                write!(writer, "{} ", meta.target())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// How much the archbench crates log, unless `RUST_LOG` is set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Show `INFO` messages and above.
    #[default]
    Default,
    /// Show `DEBUG` messages and above.
    Verbose,
    /// Show all messages, with timestamps and targets.
    ExtraVerbose,
}

impl Level {
    /// The level for a `-v` flag repeated `verbose` times.
    pub fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 => Self::Default,
            1 => Self::Verbose,
            _ => Self::ExtraVerbose,
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Default => "archbench=info",
            Self::Verbose => "archbench=debug",
            Self::ExtraVerbose => "archbench=trace",
        }
    }

    fn format(self) -> ArchbenchFormat {
        match self {
            Self::Default | Self::Verbose => ArchbenchFormat::default(),
            Self::ExtraVerbose => ArchbenchFormat {
                display_timestamp: true,
                display_level: true,
                display_target: true,
            },
        }
    }
}

/// Install a global subscriber that writes to stderr.
///
/// `RUST_LOG` overrides the directive derived from `level`.
pub fn setup_logging(level: Level) -> Result<(), FromEnvError> {
    let default_directive = level.directive().parse::<Directive>()?;
    let filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .with_env_var(EnvVars::RUST_LOG)
        .from_env()?;

    let ansi = match anstream::Stderr::choice(&std::io::stderr()) {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
        ColorChoice::Never => false,
        // We just asked anstream for a choice, that can't be auto
        ColorChoice::Auto => unreachable!(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(level.format())
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_filter(filter),
        )
        .init();

    Ok(())
}
