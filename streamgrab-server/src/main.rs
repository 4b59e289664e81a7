/* This file is part of the StreamGrab project - https://github.com/streamgrab/streamgrab
*
*  Copyright (C) 2026 StreamGrab contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use std::{fs::{set_permissions, Permissions}, os::unix::prelude::PermissionsExt, path::Path};
use actix_files::Files;
use actix_web::{HttpServer, App, web, middleware::NormalizePath};
use anyhow::Context;
use env_logger::Env;
use log::info;

mod extractor;
mod middleware;
mod render;
mod routes;
mod service;
mod state;
mod utils;
#[cfg(test)]
mod testing;

use middleware::ErrorRepresentation;
use service::GrabService;
use state::AppConfig;

const CONFIG_PATH: &str = "config.toml";


#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config: web::Data<AppConfig> = web::Data::new(AppConfig::load(Path::new(CONFIG_PATH))?);
    let service: web::Data<GrabService> = web::Data::new(GrabService::from_config(&config));
    info!(
        "Using extractor {} ({}), timeout {:?}, accepted url prefixes: {:?}",
        service.extractor_name(),
        config.extractor.program.display(),
        service.timeout(),
        config.accepted_url_prefixes,
    );

    let mut server = {
        let config = config.clone();
        HttpServer::new(move || {
            App::new()
                .wrap(NormalizePath::trim())
                .wrap(ErrorRepresentation)
                .app_data(config.clone())
                .app_data(service.clone())
                .configure(routes::configure)
                .service(Files::new("/static", config.static_content_path.as_path()))
        })
    };
    if let Some((ref ip, port)) = config.listen.tcp {
        let ip_str = ip.as_str();
        server = server.bind((ip_str, port)).with_context(|| format!("Failed to bind to tcp port {ip_str}:{port}"))?;
        info!("Listening on {ip_str}:{port}");
    }
    if let Some(ref path) = config.listen.unix {
        let path_str = path.as_str();
        server = server.bind_uds(path_str).with_context(|| format!("Failed to bind to unix socket {path_str}"))?;
        if let Some(mode) = config.listen.unix_mode {
            let perms = Permissions::from_mode(mode);
            set_permissions(path_str, perms).with_context(|| format!("Failed to change mode of unix socket {path_str} to {mode}"))?;
        }
        info!("Listening on {path_str}");
    }
    server.run()
    .await
    .context("Error while running the server")
}

mod built_info {
    // Contents generated by buildscript, using built
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
