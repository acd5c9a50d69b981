mod config;
mod wiring;

use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

use coin_sim::export::SeriesCsvWriter;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = config::Config::from_env()?;
    initialize_export_output(&config.export_output_path)?;
    let listener = TcpListener::bind(config.listen_addr).await?;

    axum::serve(listener, wiring::build_app(&config)).await?;
    Ok(())
}

fn initialize_export_output(path: &str) -> Result<(), std::io::Error> {
    let export_path = Path::new(path);

    if let Some(parent) = export_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }

    let export_file = File::create(export_path)?;
    let mut export_writer = SeriesCsvWriter::new(export_file);
    export_writer.write_header()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use coin_sim::export::SERIES_CSV_HEADER;

    use super::initialize_export_output;

    #[test]
    fn initialize_export_output_creates_parent_dir_and_writes_csv_header() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("paradox-server-export-{unique}"));
        let export_path = root.join("nested").join("series.csv");

        initialize_export_output(export_path.to_str().unwrap())
            .expect("startup should initialize the export output");

        let actual = fs::read_to_string(&export_path).expect("export output file should exist");
        assert_eq!(actual, SERIES_CSV_HEADER);

        fs::remove_dir_all(&root).expect("temp export directory should be removable");
    }
}
