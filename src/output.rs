use std::io::Write;

use luxe::{AffiliateDashboard, Categories, CatalogView, Product, Session};
use serde::Serialize;

use crate::error::CliError;

/// Write one category per line: `key \t name \t description`.
pub fn write_categories<W: Write>(
    cats: &Categories,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        return write_json(cats, writer);
    }
    for (key, cat) in cats.iter() {
        writeln!(writer, "{key}\t{}\t{}", cat.name, cat.description)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one product per line, in the order given.
///
/// TSV: id \t name \t original \t discount \t final \t badges
pub fn write_products<W: Write>(
    products: &[Product],
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        return write_json(products, writer);
    }
    let mut buf = String::new();
    for p in products {
        buf.clear();
        format_product(&mut buf, p);
        writer.write_all(buf.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a catalog view. Empty views print nothing; a failed view is an
/// error for the caller to report.
pub fn write_view<T, W, F>(
    view: CatalogView<T>,
    writer: &mut W,
    render: F,
) -> Result<(), CliError>
where
    W: Write,
    F: FnOnce(&T, &mut W) -> Result<(), CliError>,
{
    match view {
        CatalogView::Loaded(v) => render(&v, writer),
        CatalogView::Loading | CatalogView::Empty => Ok(()),
        CatalogView::Failed { message, retryable } => {
            tracing::debug!(retryable, "catalog view failed");
            Err(CliError::Failed(message))
        }
    }
}

pub fn write_dashboard<W: Write>(
    dash: &AffiliateDashboard,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        return write_json(dash, writer);
    }
    writeln!(writer, "code\t{}", dash.affiliate_code)?;
    writeln!(writer, "clicks\t{}", dash.total_clicks)?;
    writeln!(writer, "sales\t{}", dash.total_sales)?;
    writeln!(writer, "balance\t{:.2}", dash.commission_balance)?;
    writeln!(writer, "rate\t{}%", dash.current_commission_rate)?;
    writeln!(writer, "withdrawals\t{}", dash.withdrawal_history.len())?;
    writer.flush()?;
    Ok(())
}

pub fn write_session<W: Write>(session: &Session, writer: &mut W) -> Result<(), CliError> {
    let state = if session.is_authenticated() {
        "logged in"
    } else {
        "logged out"
    };
    writeln!(writer, "{state}")?;
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, writer: &mut W) -> Result<(), CliError> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn format_product(buf: &mut String, p: &Product) {
    use std::fmt::Write as _;

    // Infallible for String.
    let _ = write!(buf, "{}\t{}\t", p.id, p.name);
    if p.has_discount() {
        let _ = write!(buf, "{:.2}\t-{}%\t", p.original_price, p.discount);
    } else {
        buf.push_str("\t\t");
    }
    let _ = write!(buf, "{:.2}\t", p.final_price);

    let mut badges = Vec::new();
    if p.verified {
        badges.push("verified");
    }
    if p.is_account {
        badges.push("account");
    }
    buf.push_str(&badges.join(","));
    buf.push('\n');
}
