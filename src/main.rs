use geo_annotation::{
    AnnotationNode, Bitmap, ConfigurationManager, DeviceFix, FixTracker, GeoCoordinate,
    RangeClampingAdjuster, RecordingSurface,
};
use log::{info, warn};
use nalgebra::Vector3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AnnotationJson {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    altitude: f64,
}

#[derive(Debug, Deserialize)]
struct WalkFixJson {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    altitude: f64,
    horizontal_accuracy: f64,
    #[serde(default = "default_vertical_accuracy")]
    vertical_accuracy: f64,
    timestamp_ms: u64,
}

fn default_vertical_accuracy() -> f64 {
    10.0
}

#[derive(Debug, Deserialize)]
struct ScenarioJson {
    annotations: Vec<AnnotationJson>,
    walk: Vec<WalkFixJson>,
}

/// Built-in scenario: walking north along a street towards three landmarks
fn demo_scenario() -> ScenarioJson {
    let annotation = |name: &str, latitude: f64, longitude: f64, altitude: f64| AnnotationJson {
        name: name.into(),
        latitude,
        longitude,
        altitude,
    };
    let annotations = vec![
        annotation("cafe", 51.50180, -0.14060, 0.0),
        annotation("gate", 51.50290, -0.14190, 5.0),
        annotation("tower", 51.53000, -0.14100, 40.0),
    ];

    let walk = (0..10)
        .map(|step| WalkFixJson {
            latitude: 51.50100 + step as f64 * 0.00008,
            longitude: -0.14100,
            altitude: 0.0,
            horizontal_accuracy: if step % 3 == 0 { 25.0 } else { 6.0 },
            vertical_accuracy: default_vertical_accuracy(),
            timestamp_ms: step * 1_000,
        })
        .collect();

    ScenarioJson { annotations, walk }
}

fn run_scenario(
    scenario: ScenarioJson,
    manager: &ConfigurationManager,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = manager.config();

    let mut nodes = Vec::with_capacity(scenario.annotations.len());
    for annotation in &scenario.annotations {
        let coordinate =
            GeoCoordinate::new(annotation.latitude, annotation.longitude, annotation.altitude);
        let bitmap = Bitmap::new(1, 1, vec![255; 4]);
        let node = AnnotationNode::new(coordinate, bitmap, &config.placement)?;
        nodes.push((annotation.name.as_str(), node));
    }

    let mut tracker = FixTracker::new(config.tracker.clone());
    let mut adjuster = RangeClampingAdjuster::new(config.adjuster.clone());
    let mut surface = RecordingSurface::new();

    for (frame, step) in scenario.walk.iter().enumerate() {
        let fix = DeviceFix::new(
            GeoCoordinate::new(step.latitude, step.longitude, step.altitude),
            step.horizontal_accuracy,
            step.vertical_accuracy,
            step.timestamp_ms,
        );
        if let Err(e) = tracker.push_fix(fix) {
            warn!("frame {}: dropping fix: {}", frame, e);
            continue;
        }

        // Viewer walks forward in scene space at the same pace as the fixes
        tracker.set_scene_position(Vector3::new(0.0, 0.0, -(frame as f64)));
        // Same fix the nodes place against: the best estimate, not the latest
        adjuster.track(&tracker);
        adjuster.set_location_confirmed(frame > 0);

        for (name, node) in nodes.iter_mut() {
            match node.update(&tracker, &adjuster, &mut surface) {
                Some(result) => println!(
                    "frame {:2} {:>6}: pos=({:8.2}, {:8.2}, {:8.2}) \
                     scale={:7.3} pivot.y={:8.3} anim={:.1}s",
                    frame,
                    name,
                    result.position.x,
                    result.position.y,
                    result.position.z,
                    result.scale_factor(),
                    result.pivot.y,
                    result.animation_duration_seconds
                ),
                None => println!("frame {:2} {:>6}: skipped", frame, name),
            }
        }
    }

    info!("{} placements applied", surface.applied().len());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("geo-annotation", |s| s.as_str());

    let (scenario, config_path) = match args.len() {
        2 if args[1] == "--demo" => (demo_scenario(), None),
        3 if args[1] == "--demo" => (demo_scenario(), Some(&args[2])),
        2 | 3 => {
            let json_data = std::fs::read_to_string(&args[1])?;
            let scenario: ScenarioJson = serde_json::from_str(&json_data)?;
            (scenario, args.get(2))
        }
        _ => {
            eprintln!("Usage: {} <scenario.json> [config.json]", program);
            eprintln!("   or: {} --demo [config.json]", program);
            return Err("Invalid arguments".into());
        }
    };

    let manager = match config_path {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    info!(
        "max distance {} m, scale relative to distance: {}",
        manager.config().placement.max_distance_m,
        manager.config().placement.scale_relative_to_distance
    );

    run_scenario(scenario, &manager)
}
