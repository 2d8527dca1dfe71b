//! Line-oriented terminal front end over [`Session`].
//!
//! Items are referred to by their row number in the current listing (as shown
//! by `list`, 1-based, after sorting) or by full id.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use vyapar_core::{DomainError, ItemId, Quantity};

use crate::backup;
use crate::session::{DraftField, Session, SessionError};
use crate::types::{DraftKind, InventoryScreen, ItemRow, SortKey, StatusMessage};

pub const HELP: &str = "\
commands:
  list                      show all items
  low [threshold]           low-stock report, lowest first
  add [name]                open the add form
  edit <item>               open the edit form for an item
  set <field> <value>       fill a form field (name, stock, reorder, price,
                            supplier, unit, category)
  save                      commit the open form, or retry a failed save
  cancel                    discard the open form
  delete <item>             remove an item
  restock <item>            add 50 to a low-stock item
  value                     total inventory value
  cost <item>               cost of one restock
  summary                   dashboard figures
  sort <insertion|name|stock>
  backup <file>             write a backup
  restore <file>            replace all items from a backup
  help                      this text
  quit                      exit

<item> is a row number from `list` or a full item id.";

/// Reference to an item typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef {
    /// 1-based row in the current listing.
    Row(usize),
    Id(ItemId),
}

impl FromStr for ItemRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(row) = s.parse::<usize>() {
            return Ok(ItemRef::Row(row));
        }
        Ok(ItemRef::Id(ItemId::from_str(s)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Low(Option<Quantity>),
    Add(Option<String>),
    Edit(ItemRef),
    Set(DraftField, String),
    Save,
    Cancel,
    Delete(ItemRef),
    Restock(ItemRef),
    Value,
    Cost(ItemRef),
    Summary,
    Sort(SortKey),
    Backup(PathBuf),
    Restore(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then_some(rest);

    let cmd = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "low" => ShellCommand::Low(arg.map(str::parse::<Quantity>).transpose()?),
        "add" | "new" => ShellCommand::Add(arg.map(str::to_string)),
        "edit" => ShellCommand::Edit(item_arg(arg, "edit <item>")?),
        "set" => {
            let (field, value) = arg
                .map(|a| a.split_once(char::is_whitespace).unwrap_or((a, "")))
                .ok_or(ParseError::Usage("set <field> <value>"))?;
            ShellCommand::Set(field.parse::<DraftField>()?, value.trim().to_string())
        }
        "save" | "commit" => ShellCommand::Save,
        "cancel" => ShellCommand::Cancel,
        "delete" | "rm" => ShellCommand::Delete(item_arg(arg, "delete <item>")?),
        "restock" => ShellCommand::Restock(item_arg(arg, "restock <item>")?),
        "value" | "total" => ShellCommand::Value,
        "cost" => ShellCommand::Cost(item_arg(arg, "cost <item>")?),
        "summary" | "dashboard" => ShellCommand::Summary,
        "sort" => ShellCommand::Sort(
            arg.ok_or(ParseError::Usage("sort <insertion|name|stock>"))?
                .parse::<SortKey>()?,
        ),
        "backup" => ShellCommand::Backup(path_arg(arg, "backup <file>")?),
        "restore" => ShellCommand::Restore(path_arg(arg, "restore <file>")?),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

fn item_arg(arg: Option<&str>, usage: &'static str) -> Result<ItemRef, ParseError> {
    arg.ok_or(ParseError::Usage(usage))?.parse()
}

fn path_arg(arg: Option<&str>, usage: &'static str) -> Result<PathBuf, ParseError> {
    arg.map(PathBuf::from).ok_or(ParseError::Usage(usage))
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until EOF or `quit`.
pub fn run(session: &mut Session, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(
        out,
        "VyaparTracker: {} item(s) from {}. Type 'help' for commands.",
        session.service().list().len(),
        session.service().store_location()
    )?;

    for line in input.lines() {
        let line = line?;
        let flow = match parse(&line) {
            Ok(Some(cmd)) => execute(session, cmd, out)?,
            Ok(None) => Flow::Continue,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            break;
        }
    }

    if session.service().has_unsaved_changes() {
        tracing::warn!("exiting with changes that were not persisted");
        writeln!(out, "warning: some changes were not persisted")?;
    }
    Ok(())
}

/// Run one command. Action failures are reported on `out` through the
/// session's status line; only output errors are returned.
pub fn execute(
    session: &mut Session,
    cmd: ShellCommand,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    tracing::debug!(?cmd, "shell command");
    session.clear_status();
    match cmd {
        ShellCommand::List => {
            let screen = session.render();
            write_table(out, &screen.rows)?;
            writeln!(out, "total value: {}", screen.total_value)?;
            write_drafts(out, &screen)?;
            return Ok(Flow::Continue);
        }
        ShellCommand::Low(threshold) => {
            let rows: Vec<ItemRow> = session
                .service()
                .low_stock_report(threshold)
                .into_iter()
                .map(ItemRow::from)
                .collect();
            if rows.is_empty() {
                writeln!(out, "no low-stock items")?;
            } else {
                write_table(out, &rows)?;
            }
            return Ok(Flow::Continue);
        }
        ShellCommand::Add(name) => {
            let draft = session.begin_add();
            if let Some(name) = name {
                draft.details.name = name;
            }
            session.set_status(StatusMessage::info("Add form open; use 'set' then 'save'"));
        }
        ShellCommand::Edit(target) => {
            if let Some(id) = resolve(session, target) {
                let status = match session.begin_edit(id).map(|_| ()) {
                    Ok(()) => StatusMessage::info("Edit form open; use 'set' then 'save'"),
                    Err(err) => StatusMessage::error(err.to_string()),
                };
                session.set_status(status);
            }
        }
        ShellCommand::Set(field, value) => {
            if let Err(err) = session.set_field(field, &value) {
                session.set_status(StatusMessage::error(err.to_string()));
            }
        }
        ShellCommand::Save => {
            let _ = if session.edit_draft().is_some() {
                session.commit_edit().map(drop)
            } else if session.new_draft().is_some() {
                session.commit_add().map(drop)
            } else {
                session.save_now()
            };
        }
        ShellCommand::Cancel => {
            let text = if session.cancel_edit() {
                "Edit cancelled"
            } else if session.cancel_add() {
                "Add cancelled"
            } else {
                "Nothing to cancel"
            };
            session.set_status(StatusMessage::info(text));
        }
        ShellCommand::Delete(target) => {
            if let Some(id) = resolve(session, target) {
                let _ = session.delete(id);
            }
        }
        ShellCommand::Restock(target) => {
            if let Some(id) = resolve(session, target) {
                let _ = session.restock(id);
            }
        }
        ShellCommand::Value => {
            writeln!(out, "total value: {}", session.service().total_value())?;
            return Ok(Flow::Continue);
        }
        ShellCommand::Cost(target) => {
            if let Some(id) = resolve(session, target) {
                match session.service().restock_cost(id) {
                    Ok(cost) => {
                        writeln!(out, "restock cost: {cost}")?;
                        return Ok(Flow::Continue);
                    }
                    Err(err) => session.set_status(StatusMessage::error(err.to_string())),
                }
            }
        }
        ShellCommand::Summary => {
            write_summary(out, &session.render())?;
            return Ok(Flow::Continue);
        }
        ShellCommand::Sort(key) => {
            session.set_sort(key);
            session.set_status(StatusMessage::info(format!("Sorted by {key}")));
        }
        ShellCommand::Backup(path) => {
            let status = match backup::backup_to(session.service(), &path) {
                Ok(n) => StatusMessage::info(format!("Backed up {n} item(s) to {}", path.display())),
                Err(err) => StatusMessage::error(format!("Backup failed: {err}")),
            };
            session.set_status(status);
        }
        ShellCommand::Restore(path) => {
            let status = match backup::restore_from(session.service_mut(), &path) {
                Ok(n) => StatusMessage::info(format!("Restored {n} item(s) from {}", path.display())),
                Err(err) if err.is_unsaved() => StatusMessage::warning(format!(
                    "{}: {err}",
                    crate::session::NOT_PERSISTED
                )),
                Err(err) => StatusMessage::error(format!("Restore failed: {err}")),
            };
            session.set_status(status);
        }
        ShellCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(Flow::Continue);
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }

    if let Some(status) = session.status() {
        writeln!(out, "{status}")?;
    }
    Ok(Flow::Continue)
}

/// Turn a user reference into an item id. A bad row number is reported
/// through the status line.
fn resolve(session: &mut Session, target: ItemRef) -> Option<ItemId> {
    match target {
        ItemRef::Id(id) => Some(id),
        ItemRef::Row(row) => {
            let rows = session.render().rows;
            match row.checked_sub(1).and_then(|i| rows.get(i)) {
                Some(found) => Some(found.id),
                None => {
                    let err = SessionError::from(DomainError::validation(format!(
                        "no row {row} (there are {} rows)",
                        rows.len()
                    )));
                    session.set_status(StatusMessage::error(err.to_string()));
                    None
                }
            }
        }
    }
}

fn write_table(out: &mut impl Write, rows: &[ItemRow]) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "no items");
    }
    writeln!(
        out,
        "{:>3}  {:<24} {:>9} {:>9} {:>10} {:>12}  {:<7} {}",
        "#", "name", "stock", "reorder", "price", "value", "unit", "category"
    )?;
    for (i, row) in rows.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<24} {:>9} {:>9} {:>10} {:>12}  {:<7} {}{}",
            i + 1,
            row.name,
            row.current_stock.to_string(),
            row.reorder_point.to_string(),
            row.unit_price.to_string(),
            row.stock_value.to_string(),
            row.unit.as_str(),
            row.category,
            if row.low_stock { "  [LOW]" } else { "" },
        )?;
    }
    Ok(())
}

fn write_drafts(out: &mut impl Write, screen: &InventoryScreen) -> std::io::Result<()> {
    for draft in &screen.drafts {
        let label = match draft.kind {
            DraftKind::Add => "add form".to_string(),
            DraftKind::Edit(id) => format!("edit form ({id})"),
        };
        let d = &draft.details;
        writeln!(
            out,
            "{label}: name='{}' stock={} reorder={} price={} supplier='{}' unit={} category='{}'",
            d.name, d.current_stock, d.reorder_point, d.unit_price, d.supplier, d.unit, d.category
        )?;
    }
    if screen.unsaved {
        writeln!(out, "warning: some changes are not persisted; 'save' to retry")?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, screen: &InventoryScreen) -> std::io::Result<()> {
    let summary = &screen.summary;
    writeln!(out, "items:        {}", summary.item_count)?;
    writeln!(out, "low stock:    {}", summary.low_stock_count)?;
    writeln!(out, "total value:  {}", summary.total_value)?;
    writeln!(out, "by category:")?;
    for (category, count) in &summary.by_category {
        writeln!(out, "  {category:<28} {count}")?;
    }
    writeln!(out, "top by stock:")?;
    for level in &summary.top_by_stock {
        writeln!(out, "  {:<28} {}", level.name, level.current_stock)?;
    }
    Ok(())
}
