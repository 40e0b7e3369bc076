use crate::models::ErrorResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use extensions::{ItemId, ProductData};
use tracing::info;

const ITEM_ID_PARAM: &str = "item_id";

/// GET /extensions/products/:item_id
pub async fn get_product(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Json<ProductData> {
    info!("GET product: item_id={}", item_id);

    Json(state.extensions_api.get_product_data(None, Some(item_id)).await)
}

/// GET /extensions/query?<key>=<value>[&item_id=<id>]
pub async fn query_products(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ProductData>, (StatusCode, Json<ErrorResponse>)> {
    let mut item_id = None;
    let mut query = extensions::Query::new();

    for (key, value) in params {
        if key == ITEM_ID_PARAM {
            let id = value.parse::<ItemId>().map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!("Invalid item_id '{}'", value))),
                )
            })?;
            item_id = Some(id);
        } else {
            query = query.with(key, value);
        }
    }

    info!("GET products: query={:?}, item_id={:?}", query.first(), item_id);

    Ok(Json(
        state
            .extensions_api
            .get_product_data(Some(&query), item_id)
            .await,
    ))
}
