pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::StoreRepository;
pub use config::Settings;

use domain::Username;
use errors::AppError;

/// Shared state handed to every handler.
pub struct AppState {
    pub repo: StoreRepository,
    pub admin_username: Username,
}

impl AppState {
    pub fn new(admin_username: Username) -> Self {
        Self {
            repo: StoreRepository::in_memory(),
            admin_username,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_admin(name: &str) -> Self {
        Self::new(Username::new(name).expect("valid admin username"))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::items::set_item,
        handlers::inventory::update_inventory,
        handlers::inventory::query_inventory,
        handlers::cart::add_item_to_cart,
        handlers::cart::get_cart,
    ),
    components(schemas(
        handlers::items::SetItemRequest,
        handlers::items::ItemResponse,
        handlers::inventory::UpdateInventoryRequest,
        handlers::inventory::InventoryQueryRequest,
        handlers::inventory::ItemFilter,
        handlers::inventory::InventoryResponse,
        handlers::inventory::InventoryListResponse,
        handlers::cart::AddItemToCartRequest,
        handlers::cart::GetCartRequest,
        handlers::cart::CartSummaryResponse,
        handlers::cart::CartLineResponse,
    )),
    tags(
        (name = "items", description = "Catalog administration"),
        (name = "inventory", description = "Inventory administration"),
        (name = "cart", description = "Customer carts"),
    )
)]
pub struct ApiDoc;

/// Registers the JSON extractor config and every `/api/v1` route.
/// Unparseable bodies become 400 responses in the same shape as
/// validation errors.
pub fn routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::bad_request(err.to_string()).into());

    cfg.app_data(json_config).service(
        web::scope("/api/v1")
            .route("/item", web::post().to(handlers::items::set_item))
            .route(
                "/inventory",
                web::post().to(handlers::inventory::update_inventory),
            )
            .route(
                "/inventory/query",
                web::post().to(handlers::inventory::query_inventory),
            )
            .route("/cart", web::post().to(handlers::cart::get_cart))
            .route(
                "/cart/add-item",
                web::post().to(handlers::cart::add_item_to_cart),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
