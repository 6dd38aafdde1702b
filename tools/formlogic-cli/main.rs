use clap::{Parser, Subcommand};
use formlogic::prelude::*;
use formlogic::resolver::FALLBACK_CONFIDENCE;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Conditional-logic engine for hosted forms
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Optional engine configuration JSON
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a page with its rules and print what every pass did
    Evaluate {
        /// Path to the rules JSON file
        rules_path: String,
        /// Path to the page fixture JSON file
        page_path: String,
        /// Run on the preview surface (targets tagged, not hidden)
        #[arg(long)]
        preview: bool,
        /// Simulate typing into a field, as `field=value`. Each triggers an input event.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        updates: Vec<String>,
    },
    /// Resolve one identifier against a page
    Resolve {
        page_path: String,
        identifier: String,
        /// Only the candidate strategies, without the live DOM fallbacks
        #[arg(long)]
        authoring: bool,
    },
    /// List the fields of every form on a page as SmartFields
    Discover {
        page_path: String,
        #[arg(long, default_value = "site")]
        site: String,
        /// Only the form with this id or name
        #[arg(long)]
        form: Option<String>,
    },
    /// Package a site's active rules with the engine source
    Bundle {
        rules_path: String,
        #[arg(long)]
        site: String,
        /// Engine source to embed; defaults to a bare placeholder
        #[arg(long)]
        engine: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load config '{}': {}", path, e))
        }),
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Evaluate {
            rules_path,
            page_path,
            preview,
            updates,
        } => run_evaluate(&rules_path, &page_path, preview, &updates, config),
        Command::Resolve {
            page_path,
            identifier,
            authoring,
        } => run_resolve(&page_path, &identifier, authoring, &config),
        Command::Discover {
            page_path,
            site,
            form,
        } => run_discover(&page_path, &site, form.as_deref()),
        Command::Bundle {
            rules_path,
            site,
            engine,
        } => run_bundle(&rules_path, &site, engine.as_deref()),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_evaluate(
    rules_path: &str,
    page_path: &str,
    preview: bool,
    updates: &[String],
    mut config: EngineConfig,
) {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let rules = RuleSet::from_file(rules_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load rules '{}': {}", rules_path, e))
    });
    let doc = Document::from_file(page_path).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    if preview {
        config.surface = Surface::Preview;
    }
    let targets: Vec<String> = rules.action_targets().into_iter().map(str::to_string).collect();
    println!(
        "Loaded {} rule(s) ({} active), {} action target(s)",
        rules.len(),
        rules.active().count(),
        targets.len()
    );

    // --- 2. Start ---
    let mut page = PageRuntime::new(doc, rules, config);
    let start = Instant::now();
    let report = page
        .start()
        .unwrap_or_else(|e| exit_with_error(&format!("Page failed to start: {}", e)));
    println!("\n--- Initial Pass ({:?}) ---", start.elapsed());
    println!("{}", ReportFormatter::format_report(&report));

    if let Some(late) = page
        .rehide_late_targets()
        .unwrap_or_else(|e| exit_with_error(&format!("Late re-hide failed: {}", e)))
    {
        println!("\n--- Late Re-hide Pass ---");
        println!("{}", ReportFormatter::format_report(&late));
    }

    // --- 3. Simulated input ---
    for update in updates {
        let Some((field, value)) = update.split_once('=') else {
            exit_with_error(&format!("Expected FIELD=VALUE, got '{}'", update));
        };
        let resolver = Resolver::live(&page.config().resolver);
        let Some(resolution) = resolver.resolve_in(page.document(), field) else {
            exit_with_error(&format!("Field '{}' not found on the page", field));
        };
        apply_update(page.document_mut(), resolution.node, value)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));

        let event = match page.document().get(resolution.node).map(ControlKind::of) {
            Some(ControlKind::Checkbox | ControlKind::Radio) => DomEvent::click(resolution.node),
            _ => DomEvent::input(resolution.node),
        };
        let pass_start = Instant::now();
        match page.dispatch(event) {
            Some(report) => {
                println!("\n--- {} on '{}' ({:?}) ---", event.kind, field, pass_start.elapsed());
                println!("{}", ReportFormatter::format_report(&report));
            }
            None => println!("\n--- {} on '{}' did not trigger a pass ---", event.kind, field),
        }
    }

    // --- 4. Summary ---
    let resolver = Resolver::live(&page.config().resolver);
    println!("\n--- Target Visibility ---");
    for target in &targets {
        match resolver.resolve_in(page.document(), target) {
            Some(resolution) => println!(
                "  {:<24} {}",
                target,
                if page.document().is_rendered(resolution.node) { "visible" } else { "hidden" }
            ),
            None => println!("  {:<24} (not on page)", target),
        }
    }
    println!("\nTotal Execution:      {:?}", total_start.elapsed());
}

/// Writes a value into a control the way a visitor would.
fn apply_update(doc: &mut Document, node: NodeId, value: &str) -> std::result::Result<(), DocumentError> {
    let kind = doc.element(node).map(ControlKind::of)?;
    match kind {
        ControlKind::Checkbox => doc.set_checked(node, matches!(value, "true" | "on" | "1")),
        ControlKind::Radio => {
            let name = doc.element(node)?.attr("name").map(str::to_string);
            let group = match name {
                Some(name) => doc.radio_group(node, &name),
                None => vec![node],
            };
            let chosen = group.into_iter().find(|n| {
                doc.get(*n)
                    .and_then(|e| e.current_value())
                    .is_some_and(|v| v.eq_ignore_ascii_case(value))
            });
            doc.set_checked(chosen.unwrap_or(node), true)
        }
        ControlKind::Select { .. } => {
            for option in doc.descendants(node) {
                let element = doc.element_mut(option)?;
                if element.tag == "option" {
                    let option_value = element
                        .current_value()
                        .map(str::to_string)
                        .unwrap_or_else(|| element.text.trim().to_string());
                    element.selected = value.split(',').any(|v| v.trim() == option_value);
                }
            }
            Ok(())
        }
        _ => doc.set_value(node, value),
    }
}

fn run_resolve(page_path: &str, identifier: &str, authoring: bool, config: &EngineConfig) {
    let doc = Document::from_file(page_path).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let resolver = if authoring {
        Resolver::authoring(&config.resolver)
    } else {
        Resolver::live(&config.resolver)
    };

    match resolver.resolve_in(&doc, identifier) {
        Some(resolution) => {
            let element = doc
                .element(resolution.node)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!("Resolved '{}' -> <{}> {}", identifier, element.tag, resolution.node);
            println!("  strategy:   {}", resolution.strategy);
            println!(
                "  confidence: {}{}",
                resolution.confidence,
                if resolution.confidence == FALLBACK_CONFIDENCE { " (fallback or fuzzy)" } else { "" }
            );
            if let Some(id) = element.dom_id() {
                println!("  id:         {}", id);
            }
            if let Some(name) = element.attr("name") {
                println!("  name:       {}", name);
            }
            println!("  value:      {:?}", extract_value(&doc, resolution.node).unwrap_or_default());
        }
        None => {
            println!("'{}' could not be resolved", identifier);
            std::process::exit(2);
        }
    }
}

fn run_discover(page_path: &str, site: &str, only_form: Option<&str>) {
    let doc = Document::from_file(page_path).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let mut store = FieldMappingStore::new();

    for (index, form) in doc.forms().into_iter().enumerate() {
        let form_key = doc
            .get(form)
            .and_then(|e| e.dom_id().or(e.attr("name")).map(str::to_string))
            .unwrap_or_else(|| format!("form-{}", index));
        if only_form.is_some_and(|wanted| wanted != form_key) {
            continue;
        }
        let fields = discover_fields(&doc, form).unwrap_or_else(|e| exit_with_error(&e.to_string()));
        let diff = store.sync(site, &form_key, fields);
        println!("Form '{}': {} field(s)", form_key, diff.added.len());
        let json = serde_json::to_string_pretty(store.get(site, &form_key))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize fields: {}", e)));
        println!("{}", json);
    }
}

fn run_bundle(rules_path: &str, site: &str, engine: Option<&str>) {
    let rules = RuleSet::from_file(rules_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load rules '{}': {}", rules_path, e))
    });
    let emitter = match engine {
        Some(path) => ScriptEmitter::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => ScriptEmitter::new(""),
    };
    let bundle = emitter
        .emit(site, &rules)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    println!("{}", bundle.text);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
