//! Render thread and command queue
//!
//! A single named thread owns the [`RenderDevice`]. Everything else talks to it
//! by sending boxed closures through a bounded channel; the thread executes
//! them one at a time in submission order, so a buffer is always created
//! before it is bound and bound before it is uploaded.
//!
//! Closures own (or share ownership of) whatever resources they touch. Nothing
//! on the render thread holds a reference back into game-thread objects, so a
//! scene proxy can be dropped while its commands are still queued.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Receiver, Sender};
use thiserror::Error;

use super::device::{DeviceError, RenderDevice};
use super::global::GlobalRenderResources;
use crate::core::config::RenderThreadConfig;

/// Work item executed on the render thread
pub type RenderTask = Box<dyn FnOnce(&mut RenderCommandList<'_>) + Send + 'static>;

enum RenderMessage {
    Execute { name: &'static str, task: RenderTask },
    Shutdown,
}

/// Render thread errors
#[derive(Error, Debug)]
pub enum RenderThreadError {
    /// The OS refused to create the thread
    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Global resources could not be created on the device
    #[error("Render thread failed to start: {0}")]
    Startup(#[from] DeviceError),

    /// The render thread has exited
    #[error("Render thread is not running")]
    Disconnected,

    /// The render thread panicked while executing a command
    #[error("Render thread panicked")]
    Panicked,
}

/// Access to the device from inside a render command
///
/// Only constructed by the render thread, so holding one proves the caller is
/// running there.
pub struct RenderCommandList<'a> {
    device: &'a mut (dyn RenderDevice + 'a),
    globals: &'a GlobalRenderResources,
}

impl<'a> RenderCommandList<'a> {
    /// The device
    pub fn device(&mut self) -> &mut (dyn RenderDevice + 'a) {
        &mut *self.device
    }

    /// Resources shared by all render commands
    pub fn globals(&self) -> &'a GlobalRenderResources {
        self.globals
    }
}

/// Sending half of the render command channel
///
/// Cheap to clone; every scene proxy keeps one.
#[derive(Clone)]
pub struct RenderCommandQueue {
    sender: Sender<RenderMessage>,
}

impl RenderCommandQueue {
    /// Queue `task` behind every previously enqueued command.
    ///
    /// Blocks while the queue is full.
    pub fn enqueue<F>(&self, name: &'static str, task: F) -> Result<(), RenderThreadError>
    where
        F: FnOnce(&mut RenderCommandList<'_>) + Send + 'static,
    {
        self.sender
            .send(RenderMessage::Execute { name, task: Box::new(task) })
            .map_err(|_| RenderThreadError::Disconnected)
    }

    /// Run `task` on the render thread and wait for its result.
    ///
    /// Must not be called from the render thread itself.
    pub fn execute_and_wait<R, F>(&self, name: &'static str, task: F) -> Result<R, RenderThreadError>
    where
        R: Send + 'static,
        F: FnOnce(&mut RenderCommandList<'_>) -> R + Send + 'static,
    {
        let (result_tx, result_rx) = bounded(1);
        self.enqueue(name, move |commands| {
            let _ = result_tx.send(task(commands));
        })?;
        result_rx.recv().map_err(|_| RenderThreadError::Disconnected)
    }

    /// Wait until every command enqueued so far has executed
    pub fn flush(&self) -> Result<(), RenderThreadError> {
        self.execute_and_wait("FlushRenderingCommands", |_| ())
    }

    /// Number of commands waiting to execute
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

impl std::fmt::Debug for RenderCommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCommandQueue")
            .field("pending", &self.sender.len())
            .finish()
    }
}

/// Dedicated thread owning the render device
pub struct RenderThread {
    queue: RenderCommandQueue,
    handle: Option<JoinHandle<Box<dyn RenderDevice>>>,
}

impl RenderThread {
    /// Start the render thread and create global resources on `device`
    pub fn spawn(device: Box<dyn RenderDevice>, config: &RenderThreadConfig) -> Result<Self, RenderThreadError> {
        let (sender, receiver) = bounded(config.command_queue_capacity.max(1));
        let (startup_tx, startup_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run_render_thread(device, &receiver, &startup_tx))?;

        match startup_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                let _ = handle.join();
                return Err(RenderThreadError::Startup(error));
            }
            Err(_) => {
                let _ = handle.join();
                return Err(RenderThreadError::Panicked);
            }
        }

        log::info!(
            "Render thread '{}' started (queue capacity {})",
            config.thread_name,
            config.command_queue_capacity
        );

        Ok(Self {
            queue: RenderCommandQueue { sender },
            handle: Some(handle),
        })
    }

    /// A new handle to the command queue
    pub fn queue(&self) -> RenderCommandQueue {
        self.queue.clone()
    }

    /// Execute all pending commands, release global resources and return the device
    pub fn shutdown(mut self) -> Result<Box<dyn RenderDevice>, RenderThreadError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<Box<dyn RenderDevice>, RenderThreadError> {
        let handle = self.handle.take().ok_or(RenderThreadError::Disconnected)?;
        // A send failure means the thread already exited; join reports why
        let _ = self.queue.sender.send(RenderMessage::Shutdown);
        handle.join().map_err(|_| RenderThreadError::Panicked)
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(error) = self.stop() {
                log::error!("Render thread shutdown failed: {}", error);
            }
        }
    }
}

fn run_render_thread(
    mut device: Box<dyn RenderDevice>,
    receiver: &Receiver<RenderMessage>,
    startup: &Sender<Result<(), DeviceError>>,
) -> Box<dyn RenderDevice> {
    let globals = match GlobalRenderResources::init(device.as_mut()) {
        Ok(globals) => globals,
        Err(error) => {
            log::error!("Failed to create global render resources: {}", error);
            let _ = startup.send(Err(error));
            return device;
        }
    };
    let _ = startup.send(Ok(()));

    let mut executed: u64 = 0;
    let mut execute = |name: &'static str, task: RenderTask, device: &mut dyn RenderDevice| {
        log::trace!("Render command: {}", name);
        let mut commands = RenderCommandList { device, globals: &globals };
        task(&mut commands);
        executed += 1;
    };

    while let Ok(message) = receiver.recv() {
        match message {
            RenderMessage::Execute { name, task } => execute(name, task, device.as_mut()),
            RenderMessage::Shutdown => break,
        }
    }

    // Commands that raced with shutdown still run so their resources are released
    for message in receiver.try_iter() {
        if let RenderMessage::Execute { name, task } = message {
            execute(name, task, device.as_mut());
        }
    }

    if let Err(error) = globals.release(device.as_mut()) {
        log::error!("Failed to release global render resources: {}", error);
    }

    log::info!("Render thread exiting after {} commands", executed);
    device
}
