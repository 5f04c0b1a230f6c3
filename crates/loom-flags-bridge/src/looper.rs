// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Main-thread task delivery.
//!
//! The host only accepts outbound messages on its main (UI) thread. A
//! [`MainLooper`] is bound to the thread that attached it; tasks posted from
//! any other thread queue up in the paired [`LooperQueue`] until the main
//! thread drains them.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use tokio::sync::mpsc;
use tracing::{trace, warn};

/// A unit of work to run on the main thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Knows which thread is the main one and how to get work onto it.
#[cfg_attr(test, mockall::automock)]
pub trait MainExecutor: Send + Sync {
	fn is_main_thread(&self) -> bool;

	/// Queues `task` to run on the main thread.
	fn post(&self, task: Task);
}

/// Executor bound to the thread that created it.
#[derive(Debug)]
pub struct MainLooper {
	thread: ThreadId,
	tx: mpsc::UnboundedSender<Task>,
}

impl MainLooper {
	/// Binds a looper to the calling thread.
	///
	/// The returned queue must be drained from this same thread.
	pub fn attach() -> (Arc<Self>, LooperQueue) {
		let thread = thread::current().id();
		let (tx, rx) = mpsc::unbounded_channel();
		(Arc::new(Self { thread, tx }), LooperQueue { thread, rx })
	}
}

impl MainExecutor for MainLooper {
	fn is_main_thread(&self) -> bool {
		thread::current().id() == self.thread
	}

	fn post(&self, task: Task) {
		if self.tx.send(task).is_err() {
			warn!("main looper queue is gone, dropping task");
		}
	}
}

/// Receiving end of a [`MainLooper`].
///
/// Every draining method panics when called off the thread that attached
/// the looper, in release builds too.
#[derive(Debug)]
pub struct LooperQueue {
	thread: ThreadId,
	rx: mpsc::UnboundedReceiver<Task>,
}

impl LooperQueue {
	fn assert_main_thread(&self) {
		assert_eq!(
			thread::current().id(),
			self.thread,
			"looper queue drained off its main thread"
		);
	}

	/// Runs every task queued so far without waiting. Returns how many ran.
	pub fn run_pending(&mut self) -> usize {
		self.assert_main_thread();
		let mut ran = 0;
		while let Ok(task) = self.rx.try_recv() {
			task();
			ran += 1;
		}
		if ran > 0 {
			trace!(tasks = ran, "ran pending main thread tasks");
		}
		ran
	}

	/// Waits for the next task and runs it.
	///
	/// Returns `false` once every [`MainLooper`] handle has been dropped.
	pub async fn run_next(&mut self) -> bool {
		self.assert_main_thread();
		match self.rx.recv().await {
			Some(task) => {
				task();
				true
			}
			None => false,
		}
	}

	/// Blocks the main thread running tasks until every [`MainLooper`]
	/// handle has been dropped.
	///
	/// Must not be called from inside an async runtime.
	pub fn run(mut self) {
		self.assert_main_thread();
		while let Some(task) = self.rx.blocking_recv() {
			task();
		}
	}
}
