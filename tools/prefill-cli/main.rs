use clap::{Parser, Subcommand};
use itertools::Itertools;
use journey_prefill::prelude::*;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Inspect a form blueprint graph and try out prefill mappings
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Read the graph payload from a JSON file instead of the upstream URL
    #[arg(short, long)]
    file: Option<String>,

    /// Upstream base URL (overrides PREFILL_API_BASE_URL)
    #[arg(long)]
    url: Option<String>,

    /// Initial prefill state as JSON (`{formId: {fieldId: source}}`)
    #[arg(short, long)]
    prefill: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List forms with their fields and current mappings
    Forms,
    /// Show the grouped prefill sources for a form
    Sources { form_id: String },
    /// Report dependency cycles in the graph
    Check,
    /// Map a field of a form to a source and print the resulting mapping
    Map {
        form_id: String,
        field_id: String,
        /// Source form id (direct or transitive dependency)
        #[arg(long, requires = "from_field", conflicts_with = "global")]
        from_form: Option<String>,
        /// Source field id on `--from-form`
        #[arg(long, requires = "from_form")]
        from_field: Option<String>,
        /// Global source as `<catalog id>.<field id>`, e.g. `global_client_org.org_name`
        #[arg(long)]
        global: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let initial = match &cli.prefill {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read prefill file '{}': {}", path, e))
            });
            PrefillState::from_json(&json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse prefill file '{}': {}", path, e))
            })
        }
        None => PrefillState::new(),
    };

    let mut workspace = Workspace::new(initial);
    match &cli.file {
        Some(path) => workspace.load(&FileGraphSource::new(path)).await,
        None => {
            let config = match &cli.url {
                Some(url) => Config::new(url.as_str()),
                None => Config::from_env(),
            };
            workspace.load(&HttpGraphSource::new(&config)).await
        }
    };

    if let LoadState::Failed(message) = workspace.load_state() {
        exit_with_error(message);
    }

    match cli.command {
        Command::Forms => print_forms(&mut workspace),
        Command::Sources { form_id } => {
            select(&mut workspace, &form_id);
            print_sources(&workspace.source_groups());
        }
        Command::Check => match workspace.graph().find_cycle() {
            Some(cycle) => {
                println!("Cycle found: {}", cycle.join(" -> "));
                std::process::exit(2);
            }
            None => println!(
                "No cycles. {} forms, {} edges.",
                workspace.graph().forms.len(),
                workspace.graph().edges.len()
            ),
        },
        Command::Map {
            form_id,
            field_id,
            from_form,
            from_field,
            global,
        } => {
            select(&mut workspace, &form_id);
            run_map(&mut workspace, &field_id, from_form, from_field, global);
        }
    }
}

fn run_map(
    workspace: &mut Workspace,
    field_id: &str,
    from_form: Option<String>,
    from_field: Option<String>,
    global: Option<String>,
) {
    workspace
        .open_field(field_id)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    let groups = workspace.source_groups();
    let candidate = match (from_form, from_field, global) {
        (Some(form), Some(field), None) => [&groups.direct, &groups.transitive]
            .into_iter()
            .find_map(|group| group.candidate(&form, &field))
            .unwrap_or_else(|| {
                exit_with_error(&format!(
                    "'{}.{}' is not an upstream source of '{}'",
                    form,
                    field,
                    workspace.selected_form_id().unwrap_or_default()
                ))
            }),
        (None, None, Some(global)) => {
            let (catalog_id, field) = global.split_once('.').unwrap_or_else(|| {
                exit_with_error("Global source must look like '<catalog id>.<field id>'")
            });
            groups
                .global
                .candidate(catalog_id, field)
                .unwrap_or_else(|| exit_with_error(&format!("Unknown global source '{}'", global)))
        }
        _ => exit_with_error("Provide either --from-form/--from-field or --global"),
    };

    workspace
        .highlight(candidate)
        .and_then(|_| workspace.commit())
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    let mapping = workspace.visible_mapping();
    let sorted: Vec<_> = mapping.iter().sorted_by(|a, b| a.0.cmp(b.0)).collect();
    for (field, source) in sorted {
        println!("{} <- {} ({})", field, source.label(), source);
    }
}

fn select(workspace: &mut Workspace, form_id: &str) {
    if let Err(e) = workspace.select_form(form_id) {
        exit_with_error(&e.to_string());
    }
}

fn print_forms(workspace: &mut Workspace) {
    let form_ids: Vec<String> = workspace.graph().forms.iter().map(|f| f.id.clone()).collect();
    if form_ids.is_empty() {
        println!("No forms available.");
        return;
    }

    for form_id in form_ids {
        select(workspace, &form_id);
        let mapping = workspace.visible_mapping();
        let Some(form) = workspace.selected_form() else {
            continue;
        };
        println!("{} ({}) - {} fields", form.name, form.id, form.fields.len());
        for field in &form.fields {
            let mapped = mapping
                .get(&field.id)
                .map(|s| format!("prefilled from {}", s.label()))
                .unwrap_or_else(|| "no mapping".to_string());
            println!("  {} [{}] {}: {}", field.label, field.id, field.field_type, mapped);
        }
    }
}

fn print_sources(groups: &SourceGroups) {
    for group in groups.iter() {
        println!("{}", group.label());
        if group.forms.is_empty() {
            println!("  No sources in this group.");
            continue;
        }
        for form in &group.forms {
            let fields = form
                .fields
                .iter()
                .map(|f| format!("{} ({})", f.label, f.id))
                .join(", ");
            println!("  {} [{}]: {}", form.name, form.id, fields);
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
