//! Per-frame draw policy: skybox first, then every body in registry order.

use glam::{Mat4, Vec3};
use orrery_space::{BodyRegistry, TextureHandle, model_transform};

use crate::backend::{CullFace, RenderBackend, TextureUnit};
use crate::projection::Projection;

/// Everything one frame needs from the simulation.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    /// Drawable size in physical pixels.
    pub viewport: (u32, u32),
    pub view: Mat4,
    pub camera_position: Vec3,
    pub sim_time: f32,
    pub registry: &'a BodyRegistry,
    pub skybox: TextureHandle,
}

/// Drives a [`RenderBackend`] through one frame.
///
/// The skybox is drawn with depth writes off and front faces culled so the
/// camera sees the inside of the sphere. Both are restored before the first
/// body so bodies depth-test normally.
#[derive(Debug, Clone)]
pub struct RenderSequencer {
    projection: Projection,
    index_count: u32,
    skybox_radius: f32,
    last_viewport: Option<(u32, u32)>,
}

impl RenderSequencer {
    /// `index_count` is the index count of the shared sphere mesh.
    pub fn new(projection: Projection, index_count: u32, skybox_radius: f32) -> Self {
        Self {
            projection,
            index_count,
            skybox_radius,
            last_viewport: None,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Encode one frame. Returns the number of bodies drawn.
    pub fn render_frame<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        frame: &FrameInput<'_>,
    ) -> usize {
        let (width, height) = frame.viewport;
        if self.last_viewport != Some(frame.viewport) {
            backend.resize_viewport(width, height);
            self.last_viewport = Some(frame.viewport);
        }
        backend.set_view_projection(frame.view, self.projection.matrix(width, height));

        self.draw_skybox(backend, frame);

        let mut drawn = 0;
        for body in frame.registry.iter() {
            let Some(surface) = body.surface() else {
                continue;
            };
            backend.set_model(model_transform(body, frame.sim_time));
            backend.set_emissive(body.is_star());
            backend.bind_texture(TextureUnit::Primary, surface.primary);
            match surface.night {
                Some(night) => {
                    backend.bind_texture(TextureUnit::Night, night);
                    backend.set_night_blend(true);
                }
                None => backend.set_night_blend(false),
            }
            backend.draw_indexed(self.index_count);
            drawn += 1;
        }
        drawn
    }

    fn draw_skybox<B: RenderBackend + ?Sized>(&self, backend: &mut B, frame: &FrameInput<'_>) {
        backend.set_depth_write(false);
        backend.set_cull_face(CullFace::Front);
        backend.set_model(skybox_model(frame.camera_position, self.skybox_radius));
        backend.set_emissive(true);
        backend.set_night_blend(false);
        backend.bind_texture(TextureUnit::Primary, frame.skybox);
        backend.draw_indexed(self.index_count);
        backend.set_depth_write(true);
        backend.set_cull_face(CullFace::Back);
    }
}

/// Skybox sphere centred on the camera so it never appears to move.
pub fn skybox_model(camera_position: Vec3, radius: f32) -> Mat4 {
    Mat4::from_translation(camera_position) * Mat4::from_scale(Vec3::splat(radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DrawState;
    use orrery_space::{BodyDef, SurfaceTextures, default_bodies, seeded_rng};

    const SKYBOX: TextureHandle = TextureHandle(100);

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Resize(u32, u32),
        ViewProjection,
        Draw(DrawState, u32),
    }

    /// Records calls and tracks state the way a real backend would.
    #[derive(Default)]
    struct Recorder {
        state: DrawState,
        calls: Vec<Call>,
    }

    impl Recorder {
        fn draws(&self) -> Vec<DrawState> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw(s, _) => Some(*s),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderBackend for Recorder {
        fn resize_viewport(&mut self, width: u32, height: u32) {
            self.calls.push(Call::Resize(width, height));
        }
        fn set_view_projection(&mut self, _view: Mat4, _projection: Mat4) {
            self.calls.push(Call::ViewProjection);
        }
        fn set_depth_write(&mut self, enabled: bool) {
            self.state.depth_write = enabled;
        }
        fn set_cull_face(&mut self, face: CullFace) {
            self.state.cull_face = face;
        }
        fn set_model(&mut self, model: Mat4) {
            self.state.model = model;
        }
        fn set_emissive(&mut self, emissive: bool) {
            self.state.emissive = emissive;
        }
        fn bind_texture(&mut self, unit: TextureUnit, texture: TextureHandle) {
            self.state.bind(unit, texture);
        }
        fn set_night_blend(&mut self, enabled: bool) {
            self.state.night_blend = enabled;
        }
        fn draw_indexed(&mut self, index_count: u32) {
            self.calls.push(Call::Draw(self.state, index_count));
        }
    }

    /// Default solar system with textures attached; earth gets a night map.
    fn textured_registry() -> BodyRegistry {
        let mut registry = BodyRegistry::from_defs(default_bodies(), &mut seeded_rng(7)).unwrap();
        for (i, body) in registry.iter_mut().enumerate() {
            let night = body
                .def()
                .night_texture
                .as_ref()
                .map(|_| TextureHandle(50 + i as u32));
            body.attach_surface(SurfaceTextures {
                primary: TextureHandle(i as u32),
                night,
            });
        }
        registry
    }

    fn frame(registry: &BodyRegistry) -> FrameInput<'_> {
        FrameInput {
            viewport: (1280, 720),
            view: Mat4::IDENTITY,
            camera_position: Vec3::new(10.0, 20.0, 3000.0),
            sim_time: 12.5,
            registry,
            skybox: SKYBOX,
        }
    }

    #[test]
    fn test_skybox_drawn_first_with_depth_write_off_and_front_culled() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        seq.render_frame(&mut rec, &frame(&registry));

        let draws = rec.draws();
        let sky = draws[0];
        assert_eq!(sky.primary, Some(SKYBOX), "first draw must be the skybox");
        assert!(!sky.depth_write);
        assert_eq!(sky.cull_face, CullFace::Front);
        assert!(sky.emissive);
        assert!(!sky.night_blend);
    }

    #[test]
    fn test_state_restored_before_first_body() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        seq.render_frame(&mut rec, &frame(&registry));

        for body_draw in &rec.draws()[1..] {
            assert!(body_draw.depth_write, "depth write restored");
            assert_eq!(body_draw.cull_face, CullFace::Back, "back-face culling restored");
        }
    }

    #[test]
    fn test_one_draw_per_body_in_registry_order() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 21_600, 50_000.0);
        let mut rec = Recorder::default();
        let drawn = seq.render_frame(&mut rec, &frame(&registry));

        assert_eq!(drawn, registry.len());
        let draws = rec.draws();
        assert_eq!(draws.len(), registry.len() + 1);
        for (i, d) in draws[1..].iter().enumerate() {
            assert_eq!(d.primary, Some(TextureHandle(i as u32)));
        }
        assert!(rec.calls.iter().all(|c| match c {
            Call::Draw(_, n) => *n == 21_600,
            _ => true,
        }));
    }

    #[test]
    fn test_body_model_matches_kinematics() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        let input = frame(&registry);
        seq.render_frame(&mut rec, &input);

        let mars = registry.get_by_name("mars").unwrap();
        let idx = registry.iter().position(|b| b.name() == "mars").unwrap();
        let expected = model_transform(mars, input.sim_time);
        assert_eq!(rec.draws()[idx + 1].model, expected);
    }

    #[test]
    fn test_only_star_is_emissive() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        seq.render_frame(&mut rec, &frame(&registry));

        for (body, draw) in registry.iter().zip(&rec.draws()[1..]) {
            assert_eq!(draw.emissive, body.is_star(), "{}", body.name());
        }
    }

    #[test]
    fn test_night_blend_only_for_bodies_with_night_map() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        seq.render_frame(&mut rec, &frame(&registry));

        for (body, draw) in registry.iter().zip(&rec.draws()[1..]) {
            let has_night = body.surface().unwrap().night.is_some();
            assert_eq!(draw.night_blend, has_night, "{}", body.name());
            if has_night {
                assert_eq!(draw.night, body.surface().unwrap().night);
            }
        }
        // The body after earth must not inherit earth's blend flag.
        let earth = registry.iter().position(|b| b.name() == "earth").unwrap();
        assert!(!rec.draws()[earth + 2].night_blend);
    }

    #[test]
    fn test_skybox_follows_camera() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        let input = frame(&registry);
        seq.render_frame(&mut rec, &input);

        let sky = rec.draws()[0].model;
        assert_eq!(sky.w_axis.truncate(), input.camera_position);
        assert_eq!(sky.x_axis.x, 50_000.0);
        assert_eq!(sky, skybox_model(input.camera_position, 50_000.0));
    }

    #[test]
    fn test_resize_only_when_viewport_changes() {
        let registry = textured_registry();
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        let mut input = frame(&registry);

        seq.render_frame(&mut rec, &input);
        seq.render_frame(&mut rec, &input);
        input.viewport = (800, 600);
        seq.render_frame(&mut rec, &input);

        let resizes: Vec<_> = rec
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Resize(..)))
            .cloned()
            .collect();
        assert_eq!(resizes, vec![Call::Resize(1280, 720), Call::Resize(800, 600)]);
        assert_eq!(rec.calls[1], Call::ViewProjection);
    }

    #[test]
    fn test_bodies_without_surface_are_skipped() {
        let defs = vec![
            BodyDef::star("sun", 1400.0, 25.0),
            BodyDef::planet("mercury", 4.879, 57.9, 88.0, 58.6),
        ];
        let mut registry = BodyRegistry::from_defs(defs, &mut seeded_rng(1)).unwrap();
        if let Some(sun) = registry.iter_mut().next() {
            sun.attach_surface(SurfaceTextures {
                primary: TextureHandle(0),
                night: None,
            });
        }
        let mut seq = RenderSequencer::new(Projection::default(), 96, 50_000.0);
        let mut rec = Recorder::default();
        let drawn = seq.render_frame(&mut rec, &frame(&registry));
        assert_eq!(drawn, 1);
        assert_eq!(rec.draws().len(), 2);
    }
}
