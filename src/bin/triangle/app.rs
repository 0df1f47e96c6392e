use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::renderer::GlRenderer;

use triangle_drag::backend::opengl::GlBackend;
use triangle_drag::component::TriangleComponent;
use triangle_drag::shaders::ShaderSources;

use crate::args::Args;

pub struct App {
    event_loop: EventLoop<()>,
    // None when no context could be acquired, the window then stays empty.
    component: Option<TriangleComponent<GlBackend>>,
    window: Window,
    exit_after_first_frame: bool,
}

impl App {
    pub fn new(args: Args) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(args.width, args.height)))
            .with_resizable(false)
            .with_title("Triangle");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                // the picker has to hand back a config
                most_samples(configs, |c: &Config| c.num_samples()).expect("display offered no configs")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or(AppError::NoWindow)?;

        let component = match acquire_backend(&window, &gl_config) {
            Ok(backend) => {
                let mut triangle = TriangleComponent::mount(backend, ShaderSources::triangle());

                // captured on the first expose, once the window is mapped
                if let Some(path) = args.screenshot.clone() {
                    triangle.backend_mut().capture_next_frame(path);
                }

                Some(triangle)
            }
            Err(e) => {
                log::error!("Could not acquire drawing context: {e}");
                None
            }
        };

        Ok(Self {
            event_loop,
            component,
            window,
            exit_after_first_frame: args.screenshot.is_some(),
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            mut component,
            window,
            exit_after_first_frame,
        } = self;

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Wait;

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CursorMoved { position, .. } => {
                        if let Some(triangle) = &mut component {
                            let size = window.inner_size();
                            triangle.pointer_moved(position.x, position.y, size.width, size.height);
                        }
                    }
                    WindowEvent::Resized(size) => {
                        if let Some(triangle) = &mut component {
                            triangle.resize(size.width, size.height);
                        }
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        if let Some(triangle) = &mut component {
                            triangle.resize(new_inner_size.width, new_inner_size.height);
                        }
                    }
                    WindowEvent::CloseRequested => {
                        unmount(&mut component);
                        control_flow.set_exit();
                    }
                    _ => (),
                },
                Event::RedrawRequested(_) => {
                    let drawn = match &mut component {
                        Some(triangle) => triangle.redraw(),
                        None => false,
                    };

                    if exit_after_first_frame {
                        if !drawn {
                            log::warn!("Nothing was drawn, no frame captured");
                        }
                        unmount(&mut component);
                        control_flow.set_exit();
                    }
                }
                Event::LoopDestroyed => unmount(&mut component),
                _ => (),
            }
        })
    }
}

/// Drops the component, and with it the GL surface, while the window is alive.
fn unmount(component: &mut Option<TriangleComponent<GlBackend>>) {
    if let Some(mut triangle) = component.take() {
        triangle.unmount();
    }
}

/// Config with the most samples, the first one wins ties.
fn most_samples<T>(configs: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8) -> Option<T> {
    configs.reduce(|best, config| {
        if samples(&config) > samples(&best) {
            config
        } else {
            best
        }
    })
}

fn acquire_backend(window: &Window, config: &Config) -> Result<GlBackend, AppError> {
    let gl_display = config.display();
    let raw_window_handle = window.raw_window_handle();

    let context_attr = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_window_handle));

    let (width, height): (u32, u32) = window.inner_size().into();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(width).ok_or(AppError::EmptySurface)?,
        NonZeroU32::new(height).ok_or(AppError::EmptySurface)?,
    );

    let surface = unsafe { gl_display.create_window_surface(config, &attrs)? };
    let context = unsafe { gl_display.create_context(config, &context_attr)? };
    let context = context.make_current(&surface)?;

    gl::load_with(|s| match CString::new(s) {
        Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
        Err(_) => std::ptr::null(),
    });

    if let Some(version) = GlRenderer::version() {
        log::info!("Using OpenGL {version}");
    }

    Ok(GlBackend::new(context, surface, width, height))
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Display(String),
    #[error("display builder returned no window")]
    NoWindow,
    #[error("window has zero size")]
    EmptySurface,
    #[error(transparent)]
    Context(#[from] glutin::error::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_samples_prefers_multisampled() {
        let configs: [(u8, u8); 4] = [(0, 0), (1, 4), (2, 4), (3, 2)];

        assert_eq!(most_samples(configs.into_iter(), |c| c.1), Some((1, 4)));
    }

    #[test]
    fn most_samples_of_nothing() {
        assert_eq!(most_samples(std::iter::empty::<u8>(), |c| *c), None);
    }
}
