use clearing_scatter::prelude::*;
use clearing_scatter_examples::{
    init_tracing, print_pass_summary, render_pass_to_png, PrototypeStyle, RenderConfig,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    // A 60 m clearing with a well in the middle, trees spaced by their extent and
    // bushes filling the gaps.
    let clearing = Clearing::try_new(Vec3::new(0.0, 0.0, 0.0), 60.0)?
        .with_member(
            Member::new("well")
                .placed_in_centre()
                .with_proximity_extent(4.0),
        )
        .with_member(
            Member::new("tree")
                .with_density(2_500.0)
                .with_scale_range(0.8, 1.3)
                .with_max_tilt(4.0)
                .with_proximity_extent(3.0),
        )
        .with_member(
            Member::new("bush")
                .with_density(9_000.0)
                .with_max_per_group(200)
                .with_proximity_extent(1.2)
                .with_rotation_rule(RotationRule::FaceGroupCentre)
                .with_fixed_rotation_y(0.0),
        );

    let mut rng = StdRng::seed_from_u64(42);
    let mut runner = PlacementRunner::try_new(PlacementConfig::default())?;
    let result = runner.run(&clearing, &mut rng)?;
    print_pass_summary(&result);

    let mut rc = RenderConfig::new(900);
    rc.set_style("well", PrototypeStyle::extent([40, 90, 200]));
    rc.set_style("tree", PrototypeStyle::extent([30, 110, 40]));
    rc.set_style("bush", PrototypeStyle::dot([120, 170, 60], 3).with_heading());

    render_pass_to_png(&clearing, &result, &rc, "clearing-basic.png")
}
