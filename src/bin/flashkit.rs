use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};

use flashkit::utils::LoggingConfig;
use flashkit::{App, AppConfig, Client, Flash, RenderData, RenderOptions, Renderer, Response};

#[derive(Parser)]
#[command(name = "flashkit", version, about = "Flash message toolkit", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template with flash messages bound under `flash`
    Render {
        #[arg(long)]
        template: PathBuf,
        #[arg(long)]
        layout: Option<PathBuf>,
        /// `category=message`, may be repeated
        #[arg(long = "flash", value_name = "KEY=MESSAGE")]
        flash: Vec<String>,
    },
    /// Run a redirect round trip against an in-memory session
    Demo {
        #[arg(long, default_value = "errors")]
        key: String,
        #[arg(long, default_value = "Something went wrong")]
        message: String,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            template,
            layout,
            flash,
        } => handle_render(template, layout, flash)?,
        Command::Demo { key, message } => handle_demo(key, message).await?,
        Command::Config { command } => match command {
            ConfigCommand::Show { file, pretty } => handle_config_show(file, pretty)?,
        },
    }
    Ok(())
}

fn parse_flash_args(args: &[String]) -> anyhow::Result<Flash> {
    let mut flash = Flash::new();
    for arg in args {
        let (key, message) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("flash entry `{arg}` must look like KEY=MESSAGE"))?;
        flash.add(key, message);
    }
    Ok(flash)
}

fn handle_render(
    template: PathBuf,
    layout: Option<PathBuf>,
    flash: Vec<String>,
) -> anyhow::Result<()> {
    let flash = parse_flash_args(&flash)?;
    let renderer = Renderer::new(RenderOptions {
        html_layout: layout,
        template_dir: None,
    });

    let mut data = RenderData::new();
    data.bind_flash(&flash);
    let output = renderer
        .html(&template)
        .render(&data)
        .with_context(|| format!("rendering `{}`", template.display()))?;
    println!("{output}");
    Ok(())
}

async fn handle_demo(key: String, message: String) -> anyhow::Result<()> {
    let mut app = App::automatic();
    let view = app.renderer().html_str(
        "{{#each flash as |messages category|}}{{category}}:{{#each messages}} {{this}}{{/each}}\n{{else}}(no flash)\n{{/each}}",
    );

    app.post("/submit", move |ctx| {
        let key = key.clone();
        let message = message.clone();
        Box::pin(async move {
            ctx.flash_mut().add(key, message);
            Ok(ctx.redirect(302, "/"))
        })
    })?;
    app.get("/", move |ctx| {
        let view = view.clone();
        Box::pin(async move { ctx.render(200, &view) })
    })?;

    let mut client = Client::new(&app);
    let submitted = client.post("/submit").await;
    print_step("POST /submit", &submitted);
    print_step("GET / (after redirect)", &client.get("/").await);
    print_step("GET / (again)", &client.get("/").await);
    Ok(())
}

fn print_step(label: &str, response: &Response) {
    println!("== {label} -> {}", response.status);
    if let Some(location) = &response.location {
        println!("location: {location}");
    }
    if !response.body.is_empty() {
        print!("{}", response.body);
    }
}

fn handle_config_show(file: Option<PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let config = match file {
        Some(path) => AppConfig::from_file(&path)?,
        None => AppConfig::from_env()?,
    };
    let content = if pretty {
        serde_json::to_string_pretty(&config)?
    } else {
        serde_json::to_string(&config)?
    };
    println!("{content}");
    Ok(())
}
