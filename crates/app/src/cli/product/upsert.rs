use clap::Args;
use pantry_app::{
    database::{self, Db},
    domain::products::{
        PgProductsService, ProductsService, data::ProductUpsert, records::ProductUuid,
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct UpsertProductArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Product to replace; a new product is created when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,

    #[arg(long)]
    name: String,

    /// Unit price in minor units
    #[arg(long)]
    price: u64,

    /// Pre-discount price in minor units
    #[arg(long)]
    original_price: Option<u64>,

    /// Unit label, e.g. "500g"
    #[arg(long)]
    unit: String,

    #[arg(long, default_value = "")]
    image: String,

    #[arg(long, default_value_t = 0)]
    stock: u32,

    #[arg(long)]
    category: Option<String>,

    /// Hide the product from the catalog and from carts
    #[arg(long)]
    inactive: bool,
}

pub(crate) async fn run(args: UpsertProductArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let product = PgProductsService::new(&Db::new(pool))
        .upsert_product(ProductUpsert {
            uuid: args
                .product_uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: args.name,
            price: args.price,
            original_price: args.original_price,
            unit: args.unit,
            image: args.image,
            stock: args.stock,
            is_active: !args.inactive,
            category: args.category,
        })
        .await
        .map_err(|error| format!("failed to upsert product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("stock: {} ({})", product.stock, product.stock_label());
    println!("active: {}", product.is_active);

    Ok(())
}
