use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use foundation::color::Color;
use protocol::SessionConfig;

use crate::registry::MAX_GRID_SIDE;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Land ownership event server")]
pub struct ServerConfig {
    /// Listen address
    #[arg(long, env = "LAND_ADDR", default_value = "127.0.0.1:9200")]
    pub addr: SocketAddr,

    /// Parcels along x
    #[arg(
        long,
        env = "LAND_GRID_WIDTH",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=MAX_GRID_SIDE as i64)
    )]
    pub grid_width: u32,

    /// Parcels along z
    #[arg(
        long,
        env = "LAND_GRID_HEIGHT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=MAX_GRID_SIDE as i64)
    )]
    pub grid_height: u32,

    /// Edge length of one parcel
    #[arg(long, env = "LAND_SIZE", default_value_t = 2.0)]
    pub land_size: f64,

    /// Color of unowned parcels (`#rrggbb`)
    #[arg(long, env = "LAND_COLOR", default_value = "#7ec850")]
    pub land_color: Color,

    /// Color of owned parcels (`#rrggbb`)
    #[arg(long, env = "OWNED_LAND_COLOR", default_value = "#d9534f")]
    pub owned_land_color: Color,

    /// Scene clear color (`#rrggbb`)
    #[arg(long, env = "BACKGROUND_COLOR", default_value = "#87ceeb")]
    pub background_color: Color,

    /// Directory with the viewer bundle, served at `/`
    #[arg(long, env = "LAND_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// What every client receives as `variables`.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            background_color: self.background_color,
            land_size: self.land_size,
            land_color: self.land_color,
            owned_land_color: self.owned_land_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "land_server",
            "--grid-width",
            "3",
            "--land-size",
            "4.5",
            "--land-color",
            "#00ff00",
        ])
        .unwrap();
        assert_eq!(config.grid_width, 3);
        assert_eq!(config.grid_height, 10);

        let session = config.session_config();
        assert_eq!(session.land_size, 4.5);
        assert_eq!(session.land_color, Color::from_hex(0x00ff00).unwrap());
        assert!(session.is_valid());
    }

    #[test]
    fn rejects_grid_sides_out_of_range() {
        for side in ["0", "4097", "100000"] {
            let err = ServerConfig::try_parse_from(["land_server", "--grid-width", side]);
            assert!(err.is_err(), "width {side} accepted");
            let err = ServerConfig::try_parse_from(["land_server", "--grid-height", side]);
            assert!(err.is_err(), "height {side} accepted");
        }
        let config =
            ServerConfig::try_parse_from(["land_server", "--grid-width", "4096"]).unwrap();
        assert_eq!(config.grid_width, MAX_GRID_SIDE);
    }

    #[test]
    fn rejects_malformed_color() {
        let err = ServerConfig::try_parse_from(["land_server", "--land-color", "green"]);
        assert!(err.is_err());
    }
}
