use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use webpushkit::{NotificationDispatcher, NotificationPayload, PushConfig};

pub(crate) async fn run() -> i32 {
    let cli = Cli::parse();
    match cli.command {
        Command::Init(args) => run_init(args),
        Command::Notify(args) => run_notify(args).await,
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "webpushkit",
    version,
    about = "Set up and exercise browser push notifications"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy the service worker glue into ./public
    Init(InitArgs),
    /// Ask the push service to notify devices
    Notify(NotifyArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

#[derive(Args, Debug)]
struct NotifyArgs {
    #[arg(long, env = "WEBPUSHKIT_BASE_URL")]
    base_url: String,
    #[arg(long, env = "WEBPUSHKIT_VAPID_PUBLIC_KEY", default_value = "")]
    vapid_public_key: String,
    #[arg(long = "device-id")]
    device_ids: Vec<String>,
    #[arg(long)]
    title: String,
    #[arg(long)]
    body: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    #[arg(long)]
    tag: Option<String>,
    #[arg(long)]
    url: Option<String>,
}

/// Best effort: reports problems but always exits 0.
fn run_init(args: InitArgs) -> i32 {
    println!("Setting up the webpushkit service worker...");
    let report = match webpushkit::setup::install_worker(&args.dir) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("failed to install worker.js: {err}");
            return 0;
        }
    };

    if report.created_public_dir {
        println!("Created {}", args.dir.join("public").display());
    }
    println!("Copied service worker to {}", report.worker_path.display());
    if report.bundle_present {
        println!("Found the compiled wasm bundle in public/pkg.");
    } else {
        println!();
        println!("The worker loads public/pkg/webpushkit_bg.wasm, which is missing. Build it with:");
        println!("  wasm-pack build --target no-modules --out-dir public/pkg");
    }
    println!();
    println!("All done. Register /worker.js from your page with PushNotifications::subscribe.");
    0
}

async fn run_notify(args: NotifyArgs) -> i32 {
    let config = PushConfig::new(&args.base_url, &args.vapid_public_key);
    let dispatcher = NotificationDispatcher::new(&config);
    let payload = notify_payload(&args);
    match dispatcher.trigger(&payload, &args.device_ids).await {
        Ok(()) => {
            println!("notification sent to {} device(s)", args.device_ids.len());
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn notify_payload(args: &NotifyArgs) -> NotificationPayload {
    let mut payload = NotificationPayload::new(&args.title);
    payload.body = args.body.clone();
    payload.icon = args.icon.clone();
    payload.tag = args.tag.clone();
    payload.url = args.url.clone();
    payload
}
