use std::thread;
use std::sync::{ Arc, Condvar, Mutex, MutexGuard, PoisonError };
use std::sync::atomic::{ AtomicBool, AtomicUsize, Ordering };

use log::{ debug, info, warn };

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::tracer::RayTracer;
use crate::world::World;

/// A shared flag that asks a render to stop early.
///
/// Clones refer to the same flag, so one clone can be handed to the render
/// while another stays with whoever may want to cancel it.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        Default::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct Progress {
    done: usize,
    last_reported: f64,
}

/// Hands out pixels to render threads and tracks their completion.
///
/// Pixels are claimed in row-major order through an atomic counter, so no
/// two claims ever return the same pixel. Completion is counted separately
/// under a mutex; `wait_to_finish` sleeps until every claimed pixel has been
/// reported done.
#[derive(Debug)]
pub struct PixelManager {
    rows: usize,
    cols: usize,
    total: usize,
    next: AtomicUsize,
    progress: Mutex<Progress>,
    finished: Condvar,
    progress_interval: f64,
    token: CancelToken,
    aborted: AtomicBool,
}

impl PixelManager {
    /// Prepares to hand out the pixels of a `rows` by `cols` image.
    ///
    /// Progress is logged every `progress_interval` percent; zero disables
    /// progress logging.
    pub fn new(rows: usize, cols: usize, progress_interval: f64) -> PixelManager {
        PixelManager::with_token(rows, cols, progress_interval, CancelToken::new())
    }

    /// Like `new`, but stops handing out pixels once `token` is cancelled.
    pub fn with_token(rows: usize, cols: usize, progress_interval: f64,
        token: CancelToken) -> PixelManager {
        PixelManager {
            rows,
            cols,
            total: rows * cols,
            next: AtomicUsize::new(0),
            progress: Mutex::new(Progress::default()),
            finished: Condvar::new(),
            progress_interval,
            token,
            aborted: AtomicBool::new(false),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn lock_progress(&self) -> MutexGuard<'_, Progress> {
        // The progress record stays consistent even if a holder panicked.
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the next pixel as `(row, col)`.
    ///
    /// Returns `None` once every pixel has been claimed, or after the render
    /// has been cancelled.
    pub fn next_pixel(&self) -> Option<(usize, usize)> {
        if self.is_cancelled() {
            self.cancel();
            return None;
        }

        let index = self.next.fetch_add(1, Ordering::SeqCst);
        if index >= self.total {
            return None;
        }

        Some((index / self.cols, index % self.cols))
    }

    /// Reports one claimed pixel as done.
    pub fn pixel_done(&self) {
        let mut progress = self.lock_progress();
        progress.done += 1;

        if self.progress_interval > 0.0 {
            let percent = progress.done as f64 * 100.0 / self.total as f64;
            if percent - progress.last_reported >= self.progress_interval
                || progress.done == self.total {
                info!("rendered {:.1}% ({}/{} pixels)", percent, progress.done, self.total);
                progress.last_reported = percent;
            }
        }

        if progress.done >= self.total {
            self.finished.notify_all();
        }
    }

    /// Blocks until every pixel is done, or the render is cancelled.
    pub fn wait_to_finish(&self) {
        let mut progress = self.lock_progress();
        while progress.done < self.total && !self.is_cancelled() {
            progress = self.finished.wait(progress)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stops handing out pixels and wakes anyone waiting to finish.
    ///
    /// Only this manager stops; the token it was given is left alone.
    pub fn cancel(&self) {
        self.aborted.store(true, Ordering::SeqCst);

        let _progress = self.lock_progress();
        self.finished.notify_all();
    }

    /// Whether this manager was cancelled, directly or through its token.
    pub fn is_cancelled(&self) -> bool {
        self.aborted.load(Ordering::SeqCst) || self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.lock_progress().done >= self.total
    }
}

/// Cancels a render if the worker holding it unwinds.
struct CancelOnPanic<'a>(&'a PixelManager);

impl<'a> Drop for CancelOnPanic<'a> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.cancel();
        }
    }
}

/// The loop every render thread runs: claim a pixel, trace it, store it.
fn work(manager: &PixelManager, tracer: &RayTracer, camera: &Camera,
    canvas: &Mutex<&mut Canvas>) {
    let _guard = CancelOnPanic(manager);
    let (nx, ny) = (manager.cols(), manager.rows());

    while let Some((row, col)) = manager.next_pixel() {
        let color = camera.pixel_color(tracer, nx, ny, col, row);
        canvas.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_pixel(col, row, &color);
        manager.pixel_done();
    }
}

/// Renders `world` as seen by `camera` onto every pixel of `canvas`.
///
/// With `camera.threads() == 0` all pixels are traced on the calling thread.
/// Otherwise that many worker threads share the pixels between them.
pub fn render(world: &World, camera: &Camera, canvas: &mut Canvas)
    -> Result<(), RenderError> {
    render_with_token(world, camera, canvas, CancelToken::new())
}

/// Like `render`, but stops early once `token` is cancelled.
pub fn render_with_token(world: &World, camera: &Camera, canvas: &mut Canvas,
    token: CancelToken) -> Result<(), RenderError> {
    let manager = PixelManager::with_token(canvas.height, canvas.width,
        camera.progress_interval(), token);
    let tracer = RayTracer::new(world);
    let threads = camera.threads();

    info!("rendering {}x{} pixels using {} thread(s)",
        canvas.width, canvas.height, threads.max(1));

    let canvas = Mutex::new(canvas);
    let mut panicked = false;

    if threads == 0 {
        work(&manager, &tracer, camera, &canvas);
    } else {
        thread::scope(|scope| {
            let workers: Vec<_> = (0..threads)
                .map(|id| {
                    let (manager, tracer, canvas) = (&manager, &tracer, &canvas);
                    scope.spawn(move || {
                        debug!("render worker {} started", id);
                        work(manager, tracer, camera, canvas);
                        debug!("render worker {} finished", id);
                    })
                })
                .collect();

            manager.wait_to_finish();

            // Join everything so that no panic escapes the scope.
            for worker in workers {
                panicked |= worker.join().is_err();
            }
        });
    }

    if panicked {
        return Err(RenderError::WorkerPanicked);
    }

    if !manager.is_finished() {
        warn!("render cancelled before completion");
        return Err(RenderError::Cancelled);
    }

    Ok(())
}

/* Tests */

#[test]
fn every_pixel_is_claimed_once() {
    use std::collections::HashSet;

    let manager = PixelManager::new(7, 13, 0.0);
    let claims = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                while let Some(pixel) = manager.next_pixel() {
                    claims.lock().unwrap().push(pixel);
                    manager.pixel_done();
                }
            });
        }

        manager.wait_to_finish();
    });

    let claims = claims.into_inner().unwrap();
    let unique: HashSet<_> = claims.iter().copied().collect();
    assert_eq!(claims.len(), 7 * 13);
    assert_eq!(unique.len(), 7 * 13);
    assert!(unique.iter().all(|&(row, col)| row < 7 && col < 13));
    assert!(manager.is_finished());
    assert_eq!(manager.next_pixel(), None);
}

#[test]
fn pixels_are_claimed_in_row_major_order() {
    let manager = PixelManager::new(2, 3, 0.0);

    let claims: Vec<_> = std::iter::from_fn(|| manager.next_pixel()).collect();
    assert_eq!(claims, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
}

#[test]
fn empty_image_finishes_immediately() {
    let manager = PixelManager::new(0, 0, 10.0);

    assert_eq!(manager.next_pixel(), None);
    manager.wait_to_finish();
    assert!(manager.is_finished());
}

#[test]
fn cancelled_manager_stops() {
    let token = CancelToken::new();
    let manager = PixelManager::with_token(4, 4, 0.0, token.clone());

    assert_eq!(manager.next_pixel(), Some((0, 0)));
    token.cancel();
    assert_eq!(manager.next_pixel(), None);

    // Returns even though pixels are missing.
    manager.wait_to_finish();
    assert!(manager.is_cancelled());
    assert!(!manager.is_finished());
}

#[test]
fn worker_panic_leaves_token_alone() {
    let token = CancelToken::new();
    let manager = PixelManager::with_token(4, 4, 0.0, token.clone());

    thread::scope(|scope| {
        let worker = scope.spawn(|| {
            let _guard = CancelOnPanic(&manager);
            let _ = manager.next_pixel();
            panic!("worker failed mid-pixel");
        });

        // Wakes up although the claimed pixel is never done.
        manager.wait_to_finish();
        assert!(worker.join().is_err());
    });

    assert!(manager.is_cancelled());
    assert_eq!(manager.next_pixel(), None);
    assert!(!token.is_cancelled());

    // The token can still drive another render.
    let next = PixelManager::with_token(1, 1, 0.0, token);
    assert_eq!(next.next_pixel(), Some((0, 0)));
}

#[cfg(test)]
fn test_scene() -> (World, crate::camera::CameraBuilder) {
    use crate::color::Color;
    use crate::light::{ AmbientLight, Material, PointLight };
    use crate::shape::Shape;
    use crate::tuple::{ Point, Tuple3D, Vector };

    let mut world = World::empty();
    world.background = Color::rgb(0.1, 0.1, 0.2);
    world.ambient_light = AmbientLight::uniform(Color::white(), 0.1);
    world.geometries.add(
        Shape::sphere(Point::new(0.0, 0.0, -5.0), 1.0).unwrap()
            .with_material(Material {
                kd: Tuple3D::splat(0.6),
                ks: Tuple3D::splat(0.4),
                kr: Tuple3D::splat(0.2),
                shininess: 20,
                ..Default::default()
            })
    );
    world.geometries.add(
        Shape::plane(Point::new(0.0, -1.0, 0.0), Vector::Y)
            .with_material(Material { kd: Tuple3D::splat(0.8), ..Default::default() })
    );
    world.lights.push(PointLight::new(Color::white(), Point::new(-3.0, 4.0, 0.0)).into());

    let builder = Camera::builder()
        .location(Point::ORIGIN)
        .direction(Vector::new(0.0, 0.0, -1.0).unwrap(), Vector::Y)
        .vp_distance(1.0)
        .vp_size(1.0, 1.0)
        .progress_interval(0.0);

    (world, builder)
}

#[test]
fn threaded_render_matches_single_thread() {
    let (world, builder) = test_scene();

    let mut single = Canvas::new(12, 9);
    let camera = builder.clone().threads(0).build().unwrap();
    render(&world, &camera, &mut single).unwrap();

    let mut threaded = Canvas::new(12, 9);
    let camera = builder.threads(3).build().unwrap();
    render(&world, &camera, &mut threaded).unwrap();

    assert_eq!(single, threaded);
    // Something other than background was drawn.
    assert_ne!(single.read_pixel(6, 4), Some(world.background));
}

#[test]
fn cancelled_render_reports_error() {
    let (world, builder) = test_scene();
    let camera = builder.threads(2).build().unwrap();

    let token = CancelToken::new();
    token.cancel();

    let mut canvas = Canvas::new(4, 4);
    assert_eq!(render_with_token(&world, &camera, &mut canvas, token),
        Err(RenderError::Cancelled));
}
