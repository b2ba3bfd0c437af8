use clearing_scatter::prelude::*;
use clearing_scatter_examples::{
    init_tracing, print_pass_summary, render_pass_to_png, PrototypeStyle, RenderConfig,
};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    // Zones are authored in the clearing's local frame, normalized by its radius.
    let clearing = Clearing::try_new(Vec3::new(120.0, 0.0, -40.0), 50.0)?
        .with_yaw(25.0)
        .with_zone(
            Zone::circle("pond", Vec2::new(-0.35, 0.3), 0.3)
                .with_name("Pond")
                .with_mode(ZoneMode::Not),
        )
        .with_zone(
            Zone::circle("pond_shore", Vec2::new(-0.35, 0.3), 0.38)
                .with_edge_fill(EdgeFill::radial(4.0)),
        )
        .with_zone(
            Zone::rectangle("meadow", Vec2::new(0.35, -0.3), 0.6, 0.4)
                .with_name("Meadow")
                .with_edge_fill(EdgeFill::sides(false, false, true, true, 3.0)),
        )
        .with_zone(Zone::rectangle("meadow_full", Vec2::new(0.35, -0.3), 0.6, 0.4));

    let clearing = clearing
        .with_member(
            Member::new("reed")
                .with_density(20_000.0)
                .with_max_per_group(150)
                .with_proximity_extent(0.6)
                .with_zone("pond_shore"),
        )
        .with_member(
            Member::new("hedge")
                .with_density(8_000.0)
                .with_proximity_extent(1.0)
                .with_rotation_rule(RotationRule::FaceZoneCentre)
                .with_fixed_rotation_y(0.0)
                .with_zone("meadow"),
        )
        .with_member(
            // Trees stay out of the pond, its shore and the meadow.
            Member::new("tree")
                .with_density(3_000.0)
                .with_proximity_extent(2.5)
                .with_zones(["pond", "pond_shore", "meadow_full"], ZoneMode::Not),
        )
        .with_member(
            // No member-level mode: the pond's own NOT mode applies.
            Member::new("stone")
                .with_density(1_500.0)
                .with_proximity_extent(1.0)
                .with_zone("pond"),
        );

    let mut rng = StdRng::seed_from_u64(7);
    let mut rejections = VecSink::only([PlacementEventKind::CandidateRejected]);
    let result = PlacementRunner::try_new(PlacementConfig::default())?
        .run_with_events(&clearing, &mut rng, &mut rejections)?;
    print_pass_summary(&result);

    // Count how often each filter turned a candidate away.
    let (mut by_proximity, mut by_zone) = (0usize, 0usize);
    for event in rejections.as_slice() {
        if let PlacementEvent::CandidateRejected { reason, .. } = event {
            match reason {
                RejectReason::Proximity => by_proximity += 1,
                RejectReason::Zone => by_zone += 1,
            }
        }
    }
    println!("rejected candidates: {by_proximity} by proximity, {by_zone} by zone");

    let mut rc = RenderConfig::new(900);
    rc.set_style("reed", PrototypeStyle::dot([60, 120, 200], 2));
    rc.set_style("hedge", PrototypeStyle::dot([150, 110, 40], 3).with_heading());
    rc.set_style("tree", PrototypeStyle::extent([30, 110, 40]));
    rc.set_style("stone", PrototypeStyle::dot([110, 110, 110], 2));

    render_pass_to_png(&clearing, &result, &rc, "zones-not-mode.png")
}
