//! Padron kernel CLI
//!
//! Operational tooling around the wizard engine:
//! - `validate` loads every locale bundle under a data directory and fails
//!   on the first broken catalog or flow graph
//! - `trace` drives a cursor through a flow by answer indices and prints
//!   the requirements accumulated along the path

use anyhow::{bail, Context};
use clap::{Arg, Command};
use padron_flow::{required_documents, FlowCursor, StepKind};
use padron_locale::LocaleLoader;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Command::new("padron-kernel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Padron wizard engine tooling")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Load and validate every locale bundle")
                .arg(
                    Arg::new("data-dir")
                        .long("data-dir")
                        .default_value("data")
                        .help("Directory holding locales/ and flows/"),
                ),
        )
        .subcommand(
            Command::new("trace")
                .about("Walk a flow by answer indices and print owed documents")
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .default_value("es")
                        .help("Language of the flow to walk"),
                )
                .arg(
                    Arg::new("answers")
                        .long("answers")
                        .required(true)
                        .help("Comma-separated option indices, e.g. 0,1,0"),
                )
                .arg(
                    Arg::new("data-dir")
                        .long("data-dir")
                        .default_value("data")
                        .help("Directory holding locales/ and flows/"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("validate", args)) => {
            let data_dir = args.get_one::<String>("data-dir").expect("has default");
            validate(data_dir)
        }
        Some(("trace", args)) => {
            let data_dir = args.get_one::<String>("data-dir").expect("has default");
            let lang = args.get_one::<String>("lang").expect("has default");
            let answers = args.get_one::<String>("answers").expect("required");
            trace(data_dir, lang, answers)
        }
        _ => unreachable!("arg_required_else_help"),
    }
}

fn validate(data_dir: &str) -> anyhow::Result<()> {
    let loader = LocaleLoader::new(data_dir, "es");
    let langs = loader.available();
    if langs.is_empty() {
        bail!("no locale bundles found under {data_dir}");
    }

    for lang in &langs {
        let bundle = loader
            .load(lang)
            .with_context(|| format!("bundle {lang} failed to load"))?;
        let requirements: usize = bundle.flow.steps().map(|s| s.documents().len()).sum();
        println!(
            "{lang}: {} steps, {} messages, {} document requirements",
            bundle.flow.len(),
            bundle.messages.len(),
            requirements,
        );
    }
    println!("{} bundle(s) valid", langs.len());
    Ok(())
}

fn trace(data_dir: &str, lang: &str, answers: &str) -> anyhow::Result<()> {
    let loader = LocaleLoader::new(data_dir, "es");
    let bundle = loader.load(lang)?;

    let indices: Vec<usize> = answers
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse().with_context(|| format!("bad answer index {s:?}")))
        .collect::<anyhow::Result<_>>()?;

    let mut cursor = FlowCursor::new(&bundle.flow);
    let mut remaining = indices.into_iter();

    loop {
        let step = bundle
            .flow
            .step(cursor.current())
            .context("cursor left the graph")?;
        println!("{}: {}", step.id, step.display_text());

        match &step.kind {
            StepKind::Question { options, .. } => {
                let Some(index) = remaining.next() else { break };
                let option = options.get(index).with_context(|| {
                    format!("question {} has no option {index}", step.id)
                })?;
                println!("  -> answered {index}: {}", option.label);
                let next = option.next.clone();
                cursor.advance(next, &bundle.flow)?;
            }
            StepKind::InfoBlock { .. } => {
                let Some(next) = step.next().cloned() else { break };
                cursor.advance(next, &bundle.flow)?;
            }
        }
    }

    let owed = required_documents(cursor.history(), cursor.current(), &bundle.flow);
    if owed.is_empty() {
        println!("no documents owed on this path");
    } else {
        println!("documents owed ({}):", owed.len());
        for doc in owed {
            let mut flags = Vec::new();
            if doc.multiple_files {
                flags.push("multiple");
            }
            if doc.id_extractable {
                flags.push("id-extractable");
            }
            let suffix = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            println!("  - {}: {}{suffix}", doc.name, doc.description);
        }
    }
    Ok(())
}
