use clap::Args;
use pantry::items::MAX_QUANTITY;
use pantry_client::{
    backend::RemoteConfig,
    catalog::Catalog,
    session::CartSession,
};
use uuid::Uuid;

use crate::cli::Output;

#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct AddArgs {
    /// Product id
    pub(crate) product: Uuid,

    /// How many to add
    #[arg(
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_QUANTITY))
    )]
    pub(crate) quantity: u32,
}

#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct SetArgs {
    /// Product id
    product: Uuid,

    /// New quantity; zero removes the product
    #[arg(value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_QUANTITY)))]
    quantity: u32,
}

/// Look the product up in the catalog, then add it to whichever cart is active.
pub(crate) async fn add(
    session: &CartSession,
    remote: &RemoteConfig,
    args: AddArgs,
    output: Output,
) -> Result<(), String> {
    let catalog = Catalog::new(remote).map_err(|error| error.to_string())?;

    let product = match catalog.product(args.product).await {
        Ok(product) => product,
        Err(error) => return output.cart(Err(error)),
    };

    let backend = session.backend();

    output.cart(
        session
            .state()
            .dispatch(backend.add(product.into(), args.quantity))
            .await,
    )
}

pub(crate) async fn set(session: &CartSession, args: SetArgs, output: Output) -> Result<(), String> {
    let backend = session.backend();

    output.cart(
        session
            .state()
            .dispatch(backend.update(args.product, args.quantity))
            .await,
    )
}
