//! Poll cycles that can be superseded.
//!
//! Each timer tick begins a cycle. A cycle still in flight makes the next
//! few ticks skip; after that the old request is aborted and replaced. A
//! response is only applied if no newer cycle's response has landed first.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, warn};
use web_sys::{AbortController, AbortSignal};

use super::ApiClient;
use crate::error::FetchError;

/// Ticks an in-flight request may swallow before it is aborted.
pub const DEFAULT_MAX_SKIPS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CycleTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleStart {
	Fresh(CycleTicket),
	Superseding {
		ticket: CycleTicket,
		stale: CycleTicket,
	},
	Busy,
}

#[derive(Clone, Debug)]
pub struct CycleGate {
	issued: u64,
	applied: u64,
	in_flight: Option<(u64, u32)>,
	max_skips: u32,
}

impl Default for CycleGate {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_SKIPS)
	}
}

impl CycleGate {
	pub fn new(max_skips: u32) -> Self {
		Self {
			issued: 0,
			applied: 0,
			in_flight: None,
			max_skips,
		}
	}

	pub fn begin(&mut self) -> CycleStart {
		let in_flight = self.in_flight;
		match in_flight {
			Some((seq, skips)) if skips < self.max_skips => {
				self.in_flight = Some((seq, skips + 1));
				CycleStart::Busy
			}
			Some((seq, _)) => CycleStart::Superseding {
				ticket: self.issue(),
				stale: CycleTicket(seq),
			},
			None => CycleStart::Fresh(self.issue()),
		}
	}

	/// Marks `ticket` done. True when its response should be applied.
	pub fn finish(&mut self, ticket: CycleTicket) -> bool {
		if self.in_flight.map(|(seq, _)| seq) == Some(ticket.0) {
			self.in_flight = None;
		}
		if ticket.0 > self.applied {
			self.applied = ticket.0;
			true
		} else {
			false
		}
	}

	fn issue(&mut self) -> CycleTicket {
		self.issued += 1;
		self.in_flight = Some((self.issued, 0));
		CycleTicket(self.issued)
	}
}

/// A [`CycleGate`] plus the abort handle of the request in flight.
pub struct PollCycle {
	name: &'static str,
	gate: CycleGate,
	controller: Option<AbortController>,
}

impl PollCycle {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			gate: CycleGate::default(),
			controller: None,
		}
	}

	fn begin(&mut self) -> Option<(CycleTicket, Option<AbortSignal>)> {
		let ticket = match self.gate.begin() {
			CycleStart::Busy => {
				debug!("{}: previous request still in flight, skipping tick", self.name);
				return None;
			}
			CycleStart::Superseding { ticket, stale } => {
				warn!("{}: aborting stale request {:?}", self.name, stale);
				self.abort();
				ticket
			}
			CycleStart::Fresh(ticket) => ticket,
		};
		let controller = AbortController::new().ok();
		let signal = controller.as_ref().map(|c| c.signal());
		self.controller = controller;
		Some((ticket, signal))
	}

	fn abort(&mut self) {
		if let Some(controller) = self.controller.take() {
			controller.abort();
		}
	}
}

impl Drop for PollCycle {
	fn drop(&mut self) {
		self.abort();
	}
}

/// Runs one cycle: fetch, then `apply` the result unless it was superseded.
/// Failures are logged and leave the panel's last state in place.
pub fn run_cycle<T, Fut>(
	cycle: &Rc<RefCell<PollCycle>>,
	fetch: impl FnOnce(Option<AbortSignal>) -> Fut,
	apply: impl FnOnce(T) + 'static,
) where
	T: 'static,
	Fut: Future<Output = Result<T, FetchError>> + 'static,
{
	let Some((ticket, signal)) = cycle.borrow_mut().begin() else {
		return;
	};
	let pending = fetch(signal);
	let cycle = cycle.clone();
	spawn_local(async move {
		let result = pending.await;
		let mut cycle = cycle.borrow_mut();
		let current = cycle.gate.finish(ticket);
		match result {
			Ok(value) if current => {
				drop(cycle);
				apply(value);
			}
			Ok(_) => debug!("{}: dropping superseded response {:?}", cycle.name, ticket),
			Err(FetchError::Aborted) => debug!("{}: request {:?} aborted", cycle.name, ticket),
			Err(err) => error!("{}: {err}", cycle.name),
		}
	});
}

/// Calls `task` now and then every `interval` until the owner is cleaned up.
pub fn start_polling(interval: Duration, task: impl Fn() + 'static) {
	task();
	match set_interval_with_handle(task, interval) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(err) => error!("could not start poll timer: {err:?}"),
	}
}

/// Polls one endpoint of `client` on `interval`, handing fresh results to `apply`.
pub fn poll_endpoint<T, Fut>(
	name: &'static str,
	interval: Duration,
	client: &ApiClient,
	fetch: impl Fn(ApiClient, Option<AbortSignal>) -> Fut + 'static,
	apply: impl FnOnce(T) + Clone + 'static,
) where
	T: 'static,
	Fut: Future<Output = Result<T, FetchError>> + 'static,
{
	let cycle = Rc::new(RefCell::new(PollCycle::new(name)));
	let client = client.clone();
	start_polling(interval, move || {
		let client = client.clone();
		run_cycle(&cycle, |signal| fetch(client, signal), apply.clone());
	});
}
