use cgmath::Vector2;

use crate::backend::{Backend, InitError};
use crate::geometry::{default_top, TRIANGLE};
use crate::pointer::to_ndc;
use crate::shaders::ShaderSources;

enum State<B: Backend> {
    Ready {
        program: B::Program,
        geometry: B::Geometry,
    },
    /// Initialization failed, the surface stays empty until unmounted.
    Failed,
    Unmounted,
}

/// Red triangle whose top vertex follows the pointer.
///
/// Mounting builds the program, uploads the geometry and draws the first frame.
/// Every pointer move afterwards redraws synchronously. Graphics resources are
/// released on [`unmount`](Self::unmount) or drop.
pub struct TriangleComponent<B: Backend> {
    // declared before the backend so resources go away while its context lives
    state: State<B>,
    top: Vector2<f32>,
    backend: B,
}

impl<B: Backend> TriangleComponent<B> {
    pub fn mount(backend: B, sources: ShaderSources<'_>) -> Self {
        let mut component = Self {
            state: State::Failed,
            top: default_top(),
            backend,
        };

        match component.init(sources) {
            Ok((program, geometry)) => {
                component.state = State::Ready { program, geometry };
                log::info!("Triangle mounted");
                component.redraw();
            }
            Err(e) => log::error!("Could not initialize triangle: {e}"),
        }

        component
    }

    fn init(&mut self, sources: ShaderSources<'_>) -> Result<(B::Program, B::Geometry), InitError> {
        let program = self.backend.build_program(sources)?;
        let geometry = self.backend.upload_geometry(&TRIANGLE)?;

        Ok((program, geometry))
    }

    /// Moves the top vertex under the pointer and redraws. `px`/`py` are
    /// pixel offsets from the top left corner of a `width` x `height` surface.
    pub fn pointer_moved(&mut self, px: f64, py: f64, width: u32, height: u32) {
        if !self.is_ready() {
            return;
        }

        let Some(top) = to_ndc(px, py, width, height) else {
            return;
        };

        log::trace!("Top vertex moved to ({}, {})", top.x, top.y);
        self.top = top;
        self.redraw();
    }

    /// Draws a frame with the current top vertex. Returns whether anything
    /// was drawn, which only happens while mounted and initialized.
    pub fn redraw(&mut self) -> bool {
        match &self.state {
            State::Ready { program, geometry } => {
                self.backend.draw_frame(program, geometry, self.top);
                true
            }
            State::Failed | State::Unmounted => false,
        }
    }

    /// Surface changed size, zero sized surfaces are skipped.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.is_ready() || width == 0 || height == 0 {
            return;
        }

        self.backend.resize(width, height);
        self.redraw();
    }

    pub fn unmount(&mut self) {
        if !matches!(self.state, State::Unmounted) {
            self.state = State::Unmounted;
            log::info!("Triangle unmounted");
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    pub fn top(&self) -> Vector2<f32> {
        self.top
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use gl_wrapper::program::{PBError, ShaderStage};

    use super::*;

    const W: u32 = 640;
    const H: u32 = 480;

    /// Counts how many handed out resources have been released.
    struct Tracked<T> {
        value: T,
        released: Rc<Cell<usize>>,
    }

    impl<T> Drop for Tracked<T> {
        fn drop(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        programs: usize,
        uploads: Vec<Vec<f32>>,
        /// Index into `uploads` of the geometry drawn, and the top vertex.
        frames: Vec<(usize, Vector2<f32>)>,
        sizes: Vec<(u32, u32)>,
        released: Rc<Cell<usize>>,
    }

    impl Backend for RecordingBackend {
        type Program = Tracked<()>;
        type Geometry = Tracked<usize>;

        fn build_program(&mut self, sources: ShaderSources<'_>) -> Result<Self::Program, InitError> {
            for (stage, src) in [
                (ShaderStage::Vertex, sources.vertex),
                (ShaderStage::Fragment, sources.fragment),
            ] {
                if !src.starts_with("#version") {
                    return Err(PBError::Compilation {
                        stage,
                        log: "0:1: syntax error".to_string(),
                    }
                    .into());
                }
            }

            self.programs += 1;

            Ok(Tracked {
                value: (),
                released: Rc::clone(&self.released),
            })
        }

        fn upload_geometry(&mut self, vertices: &[f32]) -> Result<Self::Geometry, InitError> {
            self.uploads.push(vertices.to_vec());

            Ok(Tracked {
                value: self.uploads.len() - 1,
                released: Rc::clone(&self.released),
            })
        }

        fn draw_frame(
            &mut self,
            _program: &Self::Program,
            geometry: &Self::Geometry,
            top: Vector2<f32>,
        ) {
            self.frames.push((geometry.value, top));
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.sizes.push((width, height));
        }
    }

    fn mounted() -> TriangleComponent<RecordingBackend> {
        TriangleComponent::mount(RecordingBackend::default(), ShaderSources::triangle())
    }

    fn tops(c: &TriangleComponent<RecordingBackend>) -> Vec<Vector2<f32>> {
        c.backend().frames.iter().map(|(_, top)| *top).collect()
    }

    #[test]
    fn mount_draws_default_top_once() {
        let c = mounted();

        assert!(c.is_ready());
        assert_eq!(c.backend().programs, 1);
        assert_eq!(tops(&c), vec![Vector2::new(0.0, 1.0)]);
    }

    #[test]
    fn pointer_move_redraws_with_new_top() {
        let mut c = mounted();

        c.pointer_moved(0.0, 480.0, W, H);
        c.pointer_moved(320.0, 240.0, W, H);

        assert_eq!(
            tops(&c),
            vec![
                Vector2::new(0.0, 1.0),
                Vector2::new(-1.0, -1.0),
                Vector2::new(0.0, 0.0),
            ]
        );
        assert_eq!(c.top(), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn top_edge_center_restores_default() {
        let mut c = mounted();

        c.pointer_moved(100.0, 100.0, W, H);
        c.pointer_moved(320.0, 0.0, W, H);

        assert_eq!(tops(&c).last(), Some(&Vector2::new(0.0, 1.0)));
    }

    #[test]
    fn geometry_is_uploaded_once_and_only_top_changes() {
        let mut c = mounted();
        let moves: Vec<(f64, f64)> = (0..20).map(|i| (i as f64 * 31.0, i as f64 * 23.0)).collect();

        for (px, py) in &moves {
            c.pointer_moved(*px, *py, W, H);
        }

        assert_eq!(c.backend().uploads, vec![TRIANGLE.to_vec()]);
        assert!(c.backend().frames.iter().all(|(geometry, _)| *geometry == 0));

        let expected: Vec<_> = std::iter::once(Vector2::new(0.0, 1.0))
            .chain(moves.iter().map(|(px, py)| to_ndc(*px, *py, W, H).unwrap()))
            .collect();
        assert_eq!(tops(&c), expected);
    }

    #[test]
    fn invalid_shader_aborts_without_drawing() {
        let sources = ShaderSources {
            vertex: "not a shader",
            ..ShaderSources::triangle()
        };
        let mut c = TriangleComponent::mount(RecordingBackend::default(), sources);

        assert!(!c.is_ready());
        assert!(c.backend().uploads.is_empty());

        c.pointer_moved(10.0, 10.0, W, H);
        assert!(!c.redraw());

        assert!(c.backend().frames.is_empty());
        assert_eq!(c.top(), Vector2::new(0.0, 1.0));
    }

    #[test]
    fn invalid_fragment_shader_aborts() {
        let sources = ShaderSources {
            fragment: "",
            ..ShaderSources::triangle()
        };
        let c = TriangleComponent::mount(RecordingBackend::default(), sources);

        assert!(!c.is_ready());
        assert_eq!(c.backend().programs, 0);
    }

    #[test]
    fn no_redraw_after_unmount() {
        let mut c = mounted();
        c.unmount();

        c.pointer_moved(10.0, 10.0, W, H);
        assert!(!c.redraw());

        assert_eq!(c.backend().frames.len(), 1);
        assert!(!c.is_ready());
    }

    #[test]
    fn unmount_releases_resources() {
        let mut c = mounted();
        let released = Rc::clone(&c.backend().released);

        assert_eq!(released.get(), 0);
        c.unmount();
        assert_eq!(released.get(), 2);

        c.unmount();
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn redraw_reports_drawn_frame() {
        let mut c = mounted();

        assert!(c.redraw());
        assert_eq!(c.backend().frames.len(), 2);
    }

    #[test]
    fn resize_follows_surface_and_redraws() {
        let mut c = mounted();

        c.resize(1280, 960);
        c.pointer_moved(640.0, 480.0, 1280, 960);

        assert_eq!(c.backend().sizes, vec![(1280, 960)]);
        assert_eq!(
            tops(&c),
            vec![
                Vector2::new(0.0, 1.0),
                Vector2::new(0.0, 1.0),
                Vector2::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut c = mounted();

        c.resize(0, 480);
        c.resize(640, 0);

        assert!(c.backend().sizes.is_empty());
        assert_eq!(c.backend().frames.len(), 1);
    }

    #[test]
    fn resize_after_unmount_is_ignored() {
        let mut c = mounted();
        c.unmount();

        c.resize(800, 600);

        assert!(c.backend().sizes.is_empty());
    }

    #[test]
    fn empty_surface_keeps_top() {
        let mut c = mounted();

        c.pointer_moved(10.0, 10.0, 0, 0);

        assert_eq!(c.backend().frames.len(), 1);
        assert_eq!(c.top(), Vector2::new(0.0, 1.0));
    }
}
