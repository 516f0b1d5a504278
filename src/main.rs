use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use notice_console::api::AdminClient;
use notice_console::config;
use notice_console::config_modal::{ConfigKey, ConfigSaveOutcome};
use notice_console::model::NotificationStatus;
use notice_console::notice::TracingNotifier;
use notice_console::notification_modal::SubmitOutcome;
use notice_console::page::{EditTarget, NotificationPage};
use notice_console::render;

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage site notifications and introduction texts")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print a sample config file and exit
    #[arg(long)]
    example_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Online,
    Offline,
}

impl From<StatusArg> for NotificationStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Online => NotificationStatus::Online,
            StatusArg::Offline => NotificationStatus::Offline,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show one page of notifications
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Create a notification
    Add {
        #[arg(long)]
        title: String,
        /// Rich text (HTML) body
        #[arg(long)]
        content: String,
        #[arg(long, value_enum, default_value = "online")]
        status: StatusArg,
        #[arg(long, default_value = "1")]
        sort: i64,
    },
    /// Edit a notification shown on the given page
    Edit {
        #[arg(long)]
        id: i64,
        /// Page the notification is listed on
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        sort: Option<i64>,
    },
    /// Delete a notification
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Show or edit the introduction texts
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// List all configuration entries
    Show,
    /// Replace `shop` or `user` introduction text
    Set {
        key: ConfigKey,
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        value: Option<String>,
        /// Read the new value from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    if args.example_config {
        print!("{}", config::example());
        return Ok(());
    }
    let command = args
        .command
        .ok_or_else(|| anyhow!("no command given, see --help"))?;

    let cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let client = AdminClient::from_config(&cfg)?;
    info!(base_url = %client.base_url(), "admin console ready");
    let mut page = NotificationPage::new(client, TracingNotifier);
    let page_size = Some(cfg.console.page_size);

    match command {
        Command::List {
            page: page_no,
            page_size: size,
        } => {
            let data = page
                .change_page(page_no, size.or(page_size))
                .await?
                .ok_or_else(|| anyhow!("backend rejected the list request"))?;
            print!("{}", render::render_table(&data.data, data.total));
        }
        Command::Add {
            title,
            content,
            status,
            sort,
        } => {
            page.open_create();
            let form = page.notification_modal_mut();
            form.set_title(title);
            form.set_content(content);
            form.set_status(status.into());
            form.set_sort(sort);
            report(page.submit_notification().await?)?;
        }
        Command::Edit {
            id,
            page: page_no,
            title,
            content,
            status,
            sort,
        } => {
            match page.open_edit_on_page(page_no, page_size, id).await? {
                EditTarget::Opened => {}
                EditTarget::ListRejected(n) => {
                    bail!("backend rejected listing page {}", n)
                }
                EditTarget::NotOnPage(n) => bail!("notification {} is not on page {}", id, n),
            }
            let form = page.notification_modal_mut();
            if let Some(title) = title {
                form.set_title(title);
            }
            if let Some(content) = content {
                form.set_content(content);
            }
            if let Some(status) = status {
                form.set_status(status.into());
            }
            if let Some(sort) = sort {
                form.set_sort(sort);
            }
            report(page.submit_notification().await?)?;
        }
        Command::Delete { id } => {
            if !page.delete(id).await? {
                bail!("backend rejected deleting notification {}", id);
            }
        }
        Command::Config(ConfigCommand::Show) => {
            if !page.fetch_configs().await? {
                bail!("backend rejected the config request");
            }
            print!("{}", render::render_configs(page.configs()));
        }
        Command::Config(ConfigCommand::Set { key, value, file }) => {
            let value = match (value, file) {
                (Some(value), _) => value,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => bail!("either --value or --file is required"),
            };
            page.fetch_configs().await?;
            page.open_config(key);
            page.config_modal_mut().set_content(value);
            match page.submit_config().await? {
                ConfigSaveOutcome::Saved => {}
                ConfigSaveOutcome::Rejected(code) => {
                    bail!("backend rejected saving {} (code {})", key, code)
                }
                ConfigSaveOutcome::NotOpen => bail!("config editor was not open"),
            }
        }
    }

    Ok(())
}

fn report(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Created | SubmitOutcome::Updated => {
            info!(?outcome, "notification saved");
            Ok(())
        }
        SubmitOutcome::Invalid => bail!("title and content are required"),
        SubmitOutcome::Rejected(code) => bail!("backend rejected the notification (code {})", code),
        SubmitOutcome::NotOpen => bail!("notification editor was not open"),
    }
}
