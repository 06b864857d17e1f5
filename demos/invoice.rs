//! Multi-page invoice with spans, wrapped text, a nested table and totals

use std::rc::Rc;

use lopdf_grid::{
    Alignment, Border, Canvas, CellStyle, Color, Column, FontStyle, PdfCanvas, Row, Table,
    TableRef,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PRODUCTS: [(&str, &str, f64); 6] = [
    ("BOLT-M6", "Hex bolt M6x30, zinc plated", 0.12),
    ("NUT-M6", "Hex nut M6", 0.04),
    ("WASH-6", "Flat washer 6.4mm, stainless steel A2, DIN 125 form A", 0.03),
    ("BRKT-90", "Angle bracket 90 degrees", 1.85),
    ("RAIL-1M", "Mounting rail 1m, pre-drilled every 25mm for M6 hardware", 7.40),
    ("CAP-6", "Dome cap for M6 nuts", 0.09),
];

fn shipment_table(canvas: &PdfCanvas, batch: usize) -> lopdf_grid::Result<TableRef> {
    let mut shipments = Table::new(
        canvas,
        vec![
            Column::new("parcel", "Parcel").with_width(30.0),
            Column::new("carrier", "Carrier").with_width(40.0),
            Column::new("weight", "Weight").with_width(20.0).with_align(Alignment::Right),
        ],
    )?
    .with_row_spacing(0.5);
    shipments.add_rows((0..3).map(|i| {
        Row::new()
            .with("parcel", format!("P{batch}-{i}"))
            .with("carrier", if i % 2 == 0 { "Road" } else { "Rail" })
            .with("weight", format!("{:.1} kg", 2.5 + i as f64))
    }));
    Ok(Rc::new(shipments))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "invoice.pdf".to_string());

    let mut canvas = PdfCanvas::a4();
    canvas.set_font_size(10.0);

    let columns = vec![
        Column::new("line", "#").with_width(12.0).with_align(Alignment::Center),
        Column::new("sku", "SKU").with_width(28.0),
        Column::new("description", "Description").with_max_width(60.0),
        Column::new("qty", "Qty").with_width(18.0).with_align(Alignment::Right),
        Column::new("price", "Unit").with_width(22.0).with_align(Alignment::Right),
        Column::new("amount", "Amount").with_width(26.0).with_align(Alignment::Right),
    ];
    let mut table = Table::new(&canvas, columns)?
        .with_start_position(10.0, 30.0)
        .with_row_height(7.0)
        .with_row_spacing(0.5)
        .with_alternating_rows(Some(Color::rgb8(240, 244, 250)))
        .with_page_break_margin(15.0);

    canvas.set_xy(10.0, 15.0);
    canvas.set_font_style(FontStyle {
        bold: true,
        italic: false,
    });
    canvas.cell(0.0, 10.0, "Invoice 2024-0117", Border::NONE, Alignment::Left, false);

    table.add_header(&mut canvas);

    let mut subtotal = 0.0;
    for line in 0..72 {
        let (sku, description, price) = PRODUCTS[line % PRODUCTS.len()];
        let qty = 10 + (line * 7) % 90;
        let amount = qty as f64 * price;
        subtotal += amount;

        let mut row = Row::new()
            .with("line", line + 1)
            .with("sku", sku)
            .with("description", description)
            .with("qty", qty)
            .with("price", format!("{price:.2}"))
            .with("amount", format!("{amount:.2}"));

        if line % 25 == 10 {
            row = Row::new()
                .with("line", line + 1)
                .with("sku", "SHIP")
                .with_col_span("description", 3)
                .with_nested("description", shipment_table(&canvas, line)?)
                .with("amount", "0.00");
        } else if line % 30 == 4 {
            row = row.with_row_span("sku", 2);
        }

        table.add_row(&mut canvas, &row);
    }

    let tax = subtotal * 0.2;
    let summary_style = CellStyle::data().bold().with_align(Alignment::Right);
    table.add_summary_row(
        &mut canvas,
        "Subtotal",
        5,
        &Row::new().with("amount", format!("{subtotal:.2}")),
        &summary_style,
    );
    table.add_summary_row(
        &mut canvas,
        "VAT 20%",
        5,
        &Row::new().with("amount", format!("{tax:.2}")),
        &summary_style,
    );
    table.add_total_row(
        &mut canvas,
        &format!("Total due: {:.2}", subtotal + tax),
        &Row::new(),
        &summary_style.clone().with_fill(Color::light_gray()),
    );

    if let Some(err) = canvas.error() {
        tracing::warn!("Rendering degraded: {}", err);
    }

    canvas.save(&output)?;
    info!("Wrote {} pages to {}", canvas.page_count(), output);
    Ok(())
}
