//! OSRM table integration test.
//!
//! Needs a prepared OSRM dataset on disk: set `OSRM_DATA_DIR` to the
//! directory holding the `.osrm*` files and `OSRM_DATASET` to their base
//! name (default `nevada-latest`). The test is skipped when the data
//! directory is not configured.

use std::env;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::ReuseDirective;
use testcontainers::{Container, GenericImage, ImageExt, TestcontainersError};

use shotplan::matrix::{MatrixClient, MatrixConfig};

fn osrm_container(
    data_dir: &str,
    dataset: &str,
) -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(data_dir.to_string(), "/data"))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            format!("/data/{dataset}.osrm"),
        ])
        .with_container_name(format!("osrm-{dataset}-mld"))
        .with_startup_timeout(std::time::Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

#[test]
fn osrm_table_feeds_distance_matrix() {
    let Ok(data_dir) = env::var("OSRM_DATA_DIR") else {
        eprintln!("OSRM_DATA_DIR not set, skipping OSRM integration test");
        return;
    };
    let dataset = env::var("OSRM_DATASET").unwrap_or_else(|_| "nevada-latest".to_string());

    let (container, base_url) = osrm_container(&data_dir, &dataset).expect("start OSRM container");

    let client = MatrixClient::new(MatrixConfig {
        base_url,
        profile: "car".to_string(),
        timeout_secs: 10,
    })
    .expect("build matrix client");

    let locations = vec![
        (36.1147, -115.1728),
        (36.1727, -115.1580),
        (36.1215, -115.1739),
    ];

    // The container can answer before routing data is fully loaded.
    let matrix = {
        let start = std::time::Instant::now();
        let mut last = None;
        while start.elapsed() < std::time::Duration::from_secs(15) {
            last = client.table_for(&locations);
            if last.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(500));
        }
        last
    };

    let matrix = matrix.expect("fetch table");
    assert_eq!(matrix.len(), locations.len());
    assert_eq!(matrix.duration_min(0, 0), Some(0.0));
    assert!(matrix.duration_min(0, 1).is_some());
    assert!(matrix.distance_km(0, 1).is_some());

    drop(container);
}
