use std::sync::Arc;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use folio_drive::prelude::*;

fn main() {
    let credentials = CredentialStore::from_env();
    let config = GatewayConfig::from_env();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Folio Drive".into(),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: "wgpu=error,naga=warn,folio_drive=debug".into(),
                ..default()
            }),
    )
    .insert_resource(Credentials(credentials.clone()));

    match HttpGateway::new(config, credentials) {
        Ok(gateway) => {
            app.insert_resource(Gateway(Arc::new(gateway)));
        }
        Err(err) => error!("media studios disabled: {err}"),
    }

    app.add_plugins(FolioDrivePlugin).run();
}
