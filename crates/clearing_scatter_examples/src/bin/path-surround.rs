use clearing_scatter::prelude::*;
use clearing_scatter_examples::{
    init_tracing, print_pass_summary, render_pass_to_png, PrototypeStyle, RenderConfig,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    // A winding road through the clearing with a blended verge at both ends.
    let road_points = vec![
        PathPoint::new(Vec3::new(-55.0, 0.0, -20.0)).with_width(6.0),
        PathPoint::new(Vec3::new(-20.0, 0.0, -5.0)).with_width(7.0),
        PathPoint::new(Vec3::new(5.0, 0.0, 15.0))
            .with_width(8.0)
            .with_rotation(PathPointRotation::Random {
                min: -20.0,
                max: 20.0,
            }),
        PathPoint::new(Vec3::new(35.0, 0.0, 10.0)).with_width(6.5),
        PathPoint::new(Vec3::new(55.0, 0.0, 30.0)).with_width(5.0),
    ];
    let settings = PathSettings::new(0.5)
        .with_width(true)
        .with_surround(SurroundSettings::new(4.0).with_blend(true, true, 6.0));
    let mut road = ObjectPath::try_new("road", road_points, settings)?;
    road.refresh_positions(true, false);

    let clearing = Clearing::try_new(Vec3::ZERO, 65.0)?
        .with_path(road)
        .with_member(
            Member::new("lamp")
                .along_path(PathPlacement::every("road", 12.0))
                .with_fixed_rotation_y(90.0)
                .with_proximity_extent(2.0),
        )
        .with_member(
            Member::new("milestone")
                .along_path(PathPlacement::at_points("road"))
                .with_fixed_rotation_y(0.0)
                .with_proximity_extent(1.0),
        )
        .with_member(
            Member::new("pebble")
                .along_path(PathPlacement::every("road", 1.5).with_lateral_jitter(true))
                .with_max_per_group(80)
                .with_scale_range(0.3, 0.7)
                .with_proximity_extent(0.4),
        )
        .with_member(
            Member::new("tree")
                .with_density(2_000.0)
                .with_proximity_extent(5.0),
        );

    let mut rng = StdRng::seed_from_u64(2024);
    let mut placed: Vec<PlacedInstance> = Vec::new();
    let result = PlacementRunner::try_new(PlacementConfig::default())?.run_with(
        &clearing,
        &mut rng,
        &mut placed,
        &mut (),
    )?;
    print_pass_summary(&result);
    println!("materialized {} instances", placed.len());

    let mut rc = RenderConfig::new(1000);
    rc.set_style("lamp", PrototypeStyle::dot([230, 180, 30], 4).with_heading());
    rc.set_style("milestone", PrototypeStyle::dot([90, 90, 90], 3).with_heading());
    rc.set_style("pebble", PrototypeStyle::dot([140, 140, 140], 1));
    rc.set_style("tree", PrototypeStyle::extent([30, 110, 40]));

    render_pass_to_png(&clearing, &result, &rc, "path-surround.png")
}
