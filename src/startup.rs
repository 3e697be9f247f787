use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::{JwtSettings, PasswordSettings};
use crate::middleware::JwtMiddleware;
use crate::request_logging::RequestLogging;
use crate::routes::{get_profile, health_check, login, refresh, register};
use crate::store::UserStore;

pub fn run(
    listener: TcpListener,
    store: Arc<dyn UserStore>,
    jwt_config: JwtSettings,
    password_config: PasswordSettings,
) -> Result<Server, std::io::Error> {
    let store: web::Data<dyn UserStore> = web::Data::from(store);
    let jwt_config_data = web::Data::new(jwt_config.clone());
    let password_config_data = web::Data::new(password_config);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogging)
            // Shared state
            .app_data(store.clone())
            .app_data(jwt_config_data.clone())
            .app_data(password_config_data.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/auth/refresh", web::post().to(refresh))
            // Protected routes (require a valid access token)
            .service(
                web::resource("/auth/profile")
                    .wrap(JwtMiddleware::new(jwt_config.clone()))
                    .route(web::get().to(get_profile)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
