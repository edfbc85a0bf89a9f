mod common;

use common::{MATERIAL, assert_unique_ids, init_logging, right_turn};
use pretty_assertions::assert_eq;
use surframp::math::Vec3;
use surframp::ramp::{
    ChainConfig, ConnectedRamps, ConnectionFrame, ConnectionMode, NODRAW, RampConfig,
    RampDirection, RampParams, connection_frame, generate_connected_ramps,
    generate_connected_vmf,
};
use testresult::TestResult;

const EPSILON: f64 = 1e-6;

fn assert_frames_close(a: &ConnectionFrame, b: &ConnectionFrame) {
    for (x, y) in [
        (a.position, b.position),
        (a.forward, b.forward),
        (a.up, b.up),
    ] {
        assert!((x - y).length() < EPSILON, "{a:?} != {b:?}");
    }
}

fn mixed_configs() -> Vec<RampConfig> {
    vec![
        RampConfig::new(RampDirection::Right, 90.0, 1024.0),
        RampConfig::new(RampDirection::Straight, 0.0, 2048.0),
        RampConfig::new(RampDirection::Up, 45.0, 768.0),
        RampConfig::new(RampDirection::Left, 60.0, 512.0),
        RampConfig::new(RampDirection::Dip, 30.0, 1500.0),
    ]
}

#[test]
fn chain_is_continuous_in_end_mode() {
    init_logging();
    let chain = generate_connected_ramps(&right_turn(), &mixed_configs(), ConnectionMode::End);
    for pair in chain.ramps.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        assert_frames_close(
            &connection_frame(&prev.params, false).transformed(&prev.transform),
            &connection_frame(&current.params, true).transformed(&current.transform),
        );
    }
}

#[test]
fn chain_is_continuous_in_start_mode() {
    let chain = generate_connected_ramps(&right_turn(), &mixed_configs(), ConnectionMode::Start);
    for pair in chain.ramps.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        assert_frames_close(
            &connection_frame(&prev.params, true).transformed(&prev.transform),
            &connection_frame(&current.params, false).transformed(&current.transform),
        );
    }
}

#[test]
fn placed_geometry_meets_at_junction() {
    let params = RampParams {
        surf: surframp::ramp::Surf::Right,
        ..right_turn()
    };
    let chain = generate_connected_ramps(&params, &mixed_configs(), ConnectionMode::End);
    for pair in chain.ramps.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        let prev_end = prev.geometry.solids[0]
            .steps
            .last()
            .map(|step| step[1])
            .unwrap_or(Vec3::ZERO);
        let current_start = current.geometry.solids[0].steps[0][1];
        let a = prev.transform.transform_point(prev_end);
        let b = current.transform.transform_point(current_start);
        assert!((a - b).length() < EPSILON, "{a:?} != {b:?}");
    }
}

#[test]
fn two_right_turns_hide_the_junction() -> TestResult {
    init_logging();
    let configs = [
        RampConfig::new(RampDirection::Right, 90.0, 1024.0),
        RampConfig::new(RampDirection::Right, 90.0, 1024.0),
    ];
    let chain = generate_connected_ramps(&right_turn(), &configs, ConnectionMode::End);
    let document = generate_connected_vmf(&chain).ok_or("no document")?;

    let solids = &document.entities[0].solids;
    assert_eq!(solids.len(), 32);
    let caps = |index: usize| {
        let sides = &solids[index].sides;
        let n = sides.len();
        (sides[n - 2].material.as_str(), sides[n - 1].material.as_str())
    };
    assert_eq!(caps(0), (MATERIAL, NODRAW));
    assert_eq!(caps(15), (NODRAW, NODRAW));
    assert_eq!(caps(16), (NODRAW, NODRAW));
    assert_eq!(caps(31), (NODRAW, MATERIAL));

    let materials = &chain.ramps[0].cap_materials;
    assert_eq!((materials.start.as_str(), materials.end.as_str()), (MATERIAL, NODRAW));
    assert_unique_ids(&document);
    Ok(())
}

#[test]
fn empty_chain_has_no_document() {
    let chain = generate_connected_ramps(&right_turn(), &[], ConnectionMode::End);
    assert!(chain.is_empty());
    assert_eq!(chain.triangles().count(), 0);
    assert_eq!(generate_connected_vmf(&chain), None);
}

#[test]
fn looping_ramp_in_chain_has_no_caps() -> TestResult {
    let configs = [
        RampConfig::new(RampDirection::Straight, 0.0, 1024.0),
        RampConfig::new(RampDirection::Up, 360.0, 1024.0),
    ];
    let chain = generate_connected_ramps(&right_turn(), &configs, ConnectionMode::End);
    let document = generate_connected_vmf(&chain).ok_or("no document")?;
    let solids = &document.entities[0].solids;
    // the straight ramp comes first, then the 16 segments of the loop
    assert_eq!(solids.len(), 17);
    let first = &solids[0].sides;
    assert_eq!(first[first.len() - 2].material, MATERIAL);
    for solid in &solids[1..] {
        let n = solid.sides.len();
        assert_eq!(solid.sides[n - 2].material, NODRAW);
        assert_eq!(solid.sides[n - 1].material, NODRAW);
    }
    Ok(())
}

#[test]
fn chain_from_json() -> TestResult {
    let json = r#"{
        "sharedParams": {
            "rampName": "surf",
            "materialName": "dev/dev_measuregeneric01",
            "smoothness": 4
        },
        "ramps": [
            { "rampEnum": "Left", "angle": 90, "size": 1024 },
            { "rampEnum": "Right", "angle": 90, "size": 1024, "smoothness": 8 }
        ],
        "connectionMode": "end"
    }"#;
    let config = ChainConfig::from_reader(json.as_bytes())?;
    let chain = ConnectedRamps::from_config(&config);
    assert_eq!(chain.ramps.len(), 2);
    assert_eq!(chain.ramps[0].params.name, "surf_1");
    assert_eq!(chain.ramps[1].geometry.segments, 8);

    let document = generate_connected_vmf(&chain).ok_or("no document")?;
    assert_eq!(document.entities[0].solids.len(), 4 + 8);
    assert_eq!(document.entities[0].property("solidity"), Some("1"));
    assert_eq!(document.world.groups.len(), 1);
    assert_unique_ids(&document);
    Ok(())
}

#[test]
fn connected_generation_is_deterministic() -> TestResult {
    let chain = || generate_connected_ramps(&right_turn(), &mixed_configs(), ConnectionMode::Start);
    let first = generate_connected_vmf(&chain()).ok_or("no document")?;
    let second = generate_connected_vmf(&chain()).ok_or("no document")?;
    assert_eq!(first.to_vmf_string(), second.to_vmf_string());
    Ok(())
}
