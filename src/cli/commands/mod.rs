use std::str::FromStr;

use chrono::{DateTime, Utc};
use reformas_core::{
    parse_quantity, quote_warnings, BudgetAggregator, CoreError, CurrencyFormatter, DateFormatter,
    QuantityFormatter, QuoteFilter, QuoteIndexService, QuoteStore,
};
use reformas_domain::{ClientInfo, ProjectInfo, QuoteStatus, CURRENT_SCHEMA_VERSION};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    document::{DocumentRenderer, HtmlDocumentRenderer, HtmlFilePrinter, Printer},
    errors::ReformasError,
    utils::build_info,
};

use super::CliContext;

type CommandResult = Result<(), ReformasError>;
type Handler = fn(&mut CliContext, &[String]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    handler: Handler,
}

impl CommandEntry {
    const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: Handler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("catalog", "List catalog services", "catalog [search]", cmd_catalog),
        CommandEntry::new("new", "Create a quote", "new <project> <client> [address]", cmd_new),
        CommandEntry::new("list", "List stored quotes", "list [search]", cmd_list),
        CommandEntry::new("show", "Show a quote", "show [quote]", cmd_show),
        CommandEntry::new(
            "add",
            "Add a catalog service to a quote",
            "add <quote> <service-id> <quantity>",
            cmd_add,
        ),
        CommandEntry::new(
            "set-qty",
            "Change the quantity of an item",
            "set-qty <quote> <item#> <quantity>",
            cmd_set_quantity,
        ),
        CommandEntry::new(
            "remove-item",
            "Remove an item from a quote",
            "remove-item <quote> <item#>",
            cmd_remove_item,
        ),
        CommandEntry::new(
            "add-payment",
            "Add a payment installment",
            "add-payment <quote> <percentage> <description>",
            cmd_add_payment,
        ),
        CommandEntry::new(
            "schedule",
            "Generate the execution schedule from the items",
            "schedule <quote>",
            cmd_schedule,
        ),
        CommandEntry::new("status", "Change a quote status", "status <quote> <status>", cmd_status),
        CommandEntry::new("delete", "Delete a quote", "delete <quote>", cmd_delete),
        CommandEntry::new("backup", "Back up a quote now", "backup <quote> [note]", cmd_backup),
        CommandEntry::new("backups", "List the backups of a quote", "backups <quote>", cmd_backups),
        CommandEntry::new(
            "restore",
            "Replace a quote with one of its backups",
            "restore <quote> <backup>",
            cmd_restore,
        ),
        CommandEntry::new(
            "delete-backup",
            "Delete one backup of a quote",
            "delete-backup <quote> <backup>",
            cmd_delete_backup,
        ),
        CommandEntry::new(
            "config",
            "Show, snapshot or restore the settings",
            "config [show|snapshot [note]|snapshots|restore <name>]",
            cmd_config,
        ),
        CommandEntry::new(
            "render",
            "Write the printable page for a quote",
            "render <quote> <output.html>",
            cmd_render,
        ),
        CommandEntry::new("sample", "Create a demonstration quote", "sample [quote]", cmd_sample),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "Show available commands", "help", cmd_help),
    ]
}

pub fn dispatch(context: &mut CliContext, args: &[String]) -> CommandResult {
    let Some((name, rest)) = args.split_first() else {
        return cmd_help(context, &[]);
    };
    let name = name.to_lowercase();
    let entry = definitions()
        .into_iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| ReformasError::Usage(format!("unknown command `{name}`; try `help`")))?;
    (entry.handler)(context, rest)
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, ReformasError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| ReformasError::Usage(format!("missing <{name}>")))
}

fn position(args: &[String], index: usize) -> Result<usize, ReformasError> {
    let raw = arg(args, index, "item#")?;
    raw.parse::<usize>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ReformasError::Usage(format!("`{raw}` is not an item number")))
}

fn item_id_at(aggregator: &BudgetAggregator, position: usize) -> Result<Uuid, ReformasError> {
    aggregator
        .items()
        .get(position - 1)
        .map(|item| item.id)
        .ok_or_else(|| ReformasError::Usage(format!("quote has no item #{position}")))
}

fn cmd_catalog(context: &mut CliContext, args: &[String]) -> CommandResult {
    let text = args.join(" ");
    let formatter = context.formatter();
    context.out.print_header("Catálogo de serviços");
    let entries = context.catalog.search(&text, None);
    if entries.is_empty() {
        context.out.print_warning("no service matches the search");
    }
    for entry in entries {
        context.out.print_info(format!(
            "  {:>3}  {} [{}] {} / {}",
            entry.id,
            entry.name,
            entry.category,
            formatter.format_amount(entry.unit_price),
            entry.unit
        ));
        for template in &entry.material_templates {
            context.out.print_info(format!(
                "         - {} {} {} por {}",
                template.name,
                formatter.format_quantity(template.quantity_per_unit),
                template.unit,
                entry.unit
            ));
        }
    }
    Ok(())
}

fn cmd_new(context: &mut CliContext, args: &[String]) -> CommandResult {
    let project = arg(args, 0, "project")?;
    let client = arg(args, 1, "client")?;
    let address = args.get(2).map(String::as_str).unwrap_or_default();

    let summaries = QuoteIndexService::summaries(&context.store)?;
    let number = QuoteIndexService::next_number_for(&summaries, Utc::now().date_naive());
    let mut aggregator = BudgetAggregator::create(number.clone(), &context.config.quote_defaults);
    aggregator.set_project(ProjectInfo::new(project, address));
    aggregator.set_client(Some(ClientInfo::new(Uuid::new_v4().to_string(), client)));
    aggregator.save(&context.store, &number)?;
    context.remember_quote(&number)?;
    context.out.print_success(format!("Quote {number} created"));
    Ok(())
}

fn cmd_list(context: &mut CliContext, args: &[String]) -> CommandResult {
    let formatter = context.formatter();
    let summaries = QuoteIndexService::summaries(&context.store)?;
    let filter = QuoteFilter {
        search: args.join(" "),
        status: None,
    };
    let visible = QuoteIndexService::filter(&summaries, &filter);

    context.out.print_header("Orçamentos");
    for summary in &visible {
        context.out.print_info(format!(
            "  {}  {:<20} {:<24} {:>14}  {}",
            summary.number,
            summary.client,
            summary.project,
            formatter.format_amount(summary.value),
            summary.status
        ));
    }
    let stats = QuoteIndexService::stats(visible.iter().copied());
    let total = stats.total.to_string();
    let approved = stats.approved.to_string();
    let pending = stats.pending.to_string();
    let value = formatter.format_amount(stats.total_value);
    context.out.print_two_column(&[
        ("Total", total.as_str()),
        ("Aprovados", approved.as_str()),
        ("Pendentes", pending.as_str()),
        ("Valor total", value.as_str()),
    ]);
    Ok(())
}

fn cmd_show(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = context.quote_key(args.first())?;
    let aggregator = BudgetAggregator::load(&context.store, &key)?;
    let quote = aggregator.quote();
    let formatter = context.formatter();

    context.out.print_header(format!("Orçamento {}", quote.number));
    let status = quote.status.to_string();
    let created = formatter.format_date(quote.created_at.date_naive());
    let valid_until = formatter.format_date(quote.valid_until);
    context.out.print_two_column(&[
        ("Cliente", quote.client_name()),
        ("Projeto", quote.project.name.as_str()),
        ("Local", quote.project.address.as_str()),
        ("Status", status.as_str()),
        ("Criado em", created.as_str()),
        ("Válido até", valid_until.as_str()),
        ("Prazo", quote.execution_time.as_str()),
    ]);

    context.out.print_header("Itens");
    for (index, item) in quote.items.iter().enumerate() {
        context.out.print_info(format!(
            "  {:>2}. {} - {} {} x {} = {}",
            index + 1,
            item.service,
            formatter.format_quantity(item.quantity()),
            item.unit,
            formatter.format_amount(item.unit_price()),
            formatter.format_amount(item.total())
        ));
        for material in item.materials() {
            context.out.print_info(format!(
                "        - {} {} {}",
                material.name,
                formatter.format_quantity(material.quantity),
                material.unit
            ));
        }
    }
    context
        .out
        .print_info(format!("  Total: {}", formatter.format_amount(aggregator.compute_totals().total)));

    context.out.print_header("Pagamento");
    for installment in aggregator.materialize_installments() {
        context.out.print_info(format!(
            "  {} ({}) {}",
            installment.description,
            formatter.format_percentage(installment.percentage),
            formatter.format_amount(installment.value)
        ));
    }

    if !quote.execution_schedule.is_empty() {
        context.out.print_header("Cronograma");
        for entry in &quote.execution_schedule {
            context.out.print_info(format!("  {} - {}", entry.period, entry.task));
        }
    }

    for warning in quote_warnings(quote) {
        context.out.print_warning(warning);
    }
    context.remember_quote(&key)?;
    Ok(())
}

fn cmd_add(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let service = arg(args, 1, "service-id")?;
    let quantity = parse_quantity(arg(args, 2, "quantity")?)?;

    let mut aggregator = BudgetAggregator::load(&context.store, key)?;
    let id = aggregator.add_item_by_id(&context.catalog, service, quantity)?;
    aggregator.save(&context.store, key)?;

    let formatter = context.formatter();
    if let Some(item) = aggregator.quote().item(id) {
        context.out.print_success(format!(
            "Added {} ({} {}) = {}",
            item.service,
            formatter.format_quantity(item.quantity()),
            item.unit,
            formatter.format_amount(item.total())
        ));
    }
    context.out.print_info(format!(
        "Quote total: {}",
        formatter.format_amount(aggregator.compute_totals().total)
    ));
    Ok(())
}

fn cmd_set_quantity(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let position = position(args, 1)?;
    let quantity = parse_quantity(arg(args, 2, "quantity")?)?;

    let mut aggregator = BudgetAggregator::load(&context.store, key)?;
    let id = item_id_at(&aggregator, position)?;
    aggregator.update_item_quantity(id, quantity)?;
    aggregator.save(&context.store, key)?;
    context.out.print_success(format!(
        "Item #{position} updated; quote total {}",
        context.formatter().format_amount(aggregator.compute_totals().total)
    ));
    Ok(())
}

fn cmd_remove_item(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let position = position(args, 1)?;

    let mut aggregator = BudgetAggregator::load(&context.store, key)?;
    let id = item_id_at(&aggregator, position)?;
    let removed = aggregator.remove_item(id)?;
    aggregator.save(&context.store, key)?;
    context
        .out
        .print_success(format!("Removed {} from {key}", removed.service));
    Ok(())
}

fn cmd_add_payment(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let raw = arg(args, 1, "percentage")?;
    let percentage = Decimal::from_str(&raw.trim_end_matches('%').replace(',', "."))
        .map_err(|_| ReformasError::Usage(format!("`{raw}` is not a percentage")))?;
    let description = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
    if description.trim().is_empty() {
        return Err(ReformasError::Usage("missing <description>".into()));
    }

    let mut aggregator = BudgetAggregator::load(&context.store, key)?;
    aggregator.add_installment(description, percentage)?;
    aggregator.save(&context.store, key)?;
    context.out.print_success("Installment added");
    let status = aggregator.payment_status();
    if !status.balanced {
        context.out.print_warning(format!(
            "installments sum to {}",
            context.formatter().format_percentage(status.total_percentage)
        ));
    }
    Ok(())
}

fn cmd_schedule(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let mut aggregator = BudgetAggregator::load(&context.store, key)?;
    let entries = aggregator.generate_execution_schedule().to_vec();
    aggregator.save(&context.store, key)?;
    context.out.print_header("Cronograma");
    for entry in entries {
        context.out.print_info(format!("  {} - {}", entry.period, entry.task));
    }
    Ok(())
}

fn cmd_status(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let raw = arg(args, 1, "status")?;
    let status = QuoteStatus::from_str(raw).map_err(ReformasError::Usage)?;
    let quote = QuoteIndexService::change_status(&context.store, key, status)?;
    context
        .out
        .print_success(format!("Quote {} is now {}", quote.number, quote.status));
    Ok(())
}

fn cmd_delete(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    QuoteIndexService::delete(&context.store, key)?;
    if context.config.last_opened_quote.as_deref() == Some(key) {
        context.config.last_opened_quote = None;
        context.config_manager.save(&context.config)?;
    }
    context.out.print_success(format!("Quote {key} deleted"));
    Ok(())
}

fn backup_timestamp(created_at: Option<DateTime<Utc>>) -> String {
    created_at
        .map(|ts| ts.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".into())
}

fn cmd_backup(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let note = args.get(1..).map(|rest| rest.join(" ")).filter(|note| !note.is_empty());
    let quote = context
        .store
        .load(key)?
        .ok_or_else(|| CoreError::QuoteNotFound(key.to_string()))?;
    let backup = context.store.backup_quote(key, &quote, note.as_deref())?;
    context.out.print_success(format!("Backup {} created", backup.id));
    Ok(())
}

fn cmd_backups(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let backups = context.store.list_backups(key)?;
    context.out.print_header(format!("Backups de {key}"));
    if backups.is_empty() {
        context.out.print_warning("No backups found.");
    }
    for backup in &backups {
        context.out.print_info(format!(
            "  {:<48} {}",
            backup.id,
            backup_timestamp(backup.created_at)
        ));
    }
    Ok(())
}

fn cmd_restore(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let backup_id = arg(args, 1, "backup")?;
    let backup = context.store.find_backup(key, backup_id)?;
    let quote = context.store.restore_backup(&backup)?;
    context.out.print_success(format!(
        "Quote {key} restored from {} ({})",
        backup.id,
        context.formatter().format_amount(quote.total())
    ));
    Ok(())
}

fn cmd_delete_backup(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let backup_id = arg(args, 1, "backup")?;
    context.store.delete_backup(key, backup_id)?;
    context.out.print_success(format!("Backup {backup_id} deleted"));
    Ok(())
}

fn cmd_config(context: &mut CliContext, args: &[String]) -> CommandResult {
    let action = args.first().map(|value| value.to_lowercase());
    match action.as_deref() {
        None | Some("show") => {
            let path = context.config_manager.config_path().display().to_string();
            let quotes = context.config.resolve_quote_root().display().to_string();
            let last = context.config.last_opened_quote.clone().unwrap_or_default();
            context.out.print_header("Configuração");
            context.out.print_two_column(&[
                ("Arquivo", path.as_str()),
                ("Empresa", context.config.company.name.as_str()),
                ("Idioma", context.config.locale.as_str()),
                ("Moeda", context.config.currency.as_str()),
                ("Orçamentos", quotes.as_str()),
                ("Último orçamento", last.as_str()),
            ]);
        }
        Some("snapshot") => {
            let note = args.get(1..).map(|rest| rest.join(" ")).filter(|note| !note.is_empty());
            let snapshot = context.config_manager.snapshot(&context.config, note.as_deref())?;
            context.out.print_success(format!("Snapshot {} created", snapshot.name));
        }
        Some("snapshots") => {
            let snapshots = context.config_manager.snapshots()?;
            context.out.print_header("Snapshots da configuração");
            if snapshots.is_empty() {
                context.out.print_warning("No snapshots found.");
            }
            for snapshot in &snapshots {
                context.out.print_info(format!(
                    "  {:<48} {}",
                    snapshot.name,
                    backup_timestamp(snapshot.created_at)
                ));
            }
        }
        Some("restore") => {
            let name = arg(args, 1, "name")?;
            context.config = context.config_manager.restore(name)?;
            context.out.print_success(format!("Settings restored from {name}"));
        }
        Some(other) => {
            return Err(ReformasError::Usage(format!(
                "unknown config action `{other}`; use show, snapshot, snapshots or restore"
            )));
        }
    }
    Ok(())
}

fn cmd_render(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = arg(args, 0, "quote")?;
    let output = arg(args, 1, "output.html")?;

    let aggregator = BudgetAggregator::load(&context.store, key)?;
    aggregator.validate_for_preview()?;
    let renderer = HtmlDocumentRenderer::new(context.config.company.clone(), context.formatter());
    let document = renderer.render(aggregator.quote())?;
    let receipt = HtmlFilePrinter::new(output, context.config.print).print(&document)?;
    context.out.print_success(format!(
        "Wrote {} ({} bytes)",
        receipt.path.display(),
        receipt.bytes
    ));
    Ok(())
}

/// Builds a quote from the first two catalog services so a new install has something to show.
fn cmd_sample(context: &mut CliContext, args: &[String]) -> CommandResult {
    let key = match args.first() {
        Some(key) => key.clone(),
        None => {
            let summaries = QuoteIndexService::summaries(&context.store)?;
            QuoteIndexService::next_number_for(&summaries, Utc::now().date_naive())
        }
    };
    let mut aggregator = BudgetAggregator::create(key.clone(), &context.config.quote_defaults);
    aggregator.set_client(Some(
        ClientInfo::new(Uuid::new_v4().to_string(), "Maria Silva")
            .with_phone("(51) 98888-7777")
            .with_address("Av. Ipiranga, 1000 - Porto Alegre/RS"),
    ));
    aggregator.set_project(ProjectInfo::new(
        "Reforma do apartamento",
        "Av. Ipiranga, 1000 - Apto 302",
    ));
    let quantities = [Decimal::from(10), Decimal::from(2)];
    for (entry, quantity) in context.catalog.entries().iter().zip(quantities) {
        aggregator.add_item(entry, quantity)?;
    }
    aggregator.generate_execution_schedule();
    aggregator.save(&context.store, &key)?;
    context.remember_quote(&key)?;
    context.out.print_success(format!(
        "Sample quote {key} saved ({})",
        context.formatter().format_amount(aggregator.compute_totals().total)
    ));
    Ok(())
}

fn cmd_version(context: &mut CliContext, _args: &[String]) -> CommandResult {
    let meta = build_info::current();
    context.out.print_header(format!("P&G Reformas {}", meta.version));
    let schema = format!("v{CURRENT_SCHEMA_VERSION}");
    let build = format!("{} ({})", meta.git_hash, meta.git_status);
    context.out.print_two_column(&[
        ("CLI version", build_info::CLI_VERSION),
        ("Quote schema", schema.as_str()),
        ("Build hash", build.as_str()),
        ("Built at", meta.timestamp),
        ("Target", meta.target),
        ("Profile", meta.profile),
        ("Rustc", meta.rustc),
    ]);
    Ok(())
}

fn cmd_help(context: &mut CliContext, _args: &[String]) -> CommandResult {
    context.out.print_header("Commands");
    for entry in definitions() {
        context
            .out
            .print_info(format!("  {:<44} {}", entry.usage, entry.description));
    }
    Ok(())
}
