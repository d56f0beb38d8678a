use std::io::{self, Write};

use pantry::receipt::format_minor;
use pantry_client::{backend::RemoteConfig, catalog::Catalog};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::cli::Output;

pub(crate) async fn list(remote: &RemoteConfig, output: Output) -> Result<(), String> {
    let catalog = Catalog::new(remote).map_err(|error| error.to_string())?;
    let result = catalog.products().await;

    if output.json {
        return output.outcome(result);
    }

    let products = result.map_err(|error| error.to_string())?;

    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Unit", "Price", "Availability"]);

    for product in products {
        let price = format_minor(product.price, output.currency)
            .map_err(|error| format!("failed to format price: {error}"))?;

        builder.push_record([
            product.id.to_string(),
            product.name,
            product.unit,
            price,
            product.stock_label,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());

    writeln!(io::stdout().lock(), "{table}").map_err(|error| error.to_string())
}
