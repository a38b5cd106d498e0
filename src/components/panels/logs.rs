use std::collections::VecDeque;

use leptos::prelude::*;

/// Most recent log lines, oldest evicted first.
#[derive(Clone, Debug, PartialEq)]
pub struct LogBuffer {
	capacity: usize,
	next_seq: u64,
	lines: VecDeque<(u64, String)>,
}

impl LogBuffer {
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity: capacity.max(1),
			next_seq: 0,
			lines: VecDeque::with_capacity(capacity.max(1)),
		}
	}

	pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
		for line in lines {
			self.lines.push_back((self.next_seq, line));
			self.next_seq += 1;
		}
		while self.lines.len() > self.capacity {
			self.lines.pop_front();
		}
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	pub fn lines(&self) -> impl Iterator<Item = &str> {
		self.lines.iter().map(|(_, line)| line.as_str())
	}

	/// Lines tagged with their arrival sequence number.
	pub fn entries(&self) -> impl Iterator<Item = (u64, &str)> {
		self.lines.iter().map(|(seq, line)| (*seq, line.as_str()))
	}
}

impl Default for LogBuffer {
	fn default() -> Self {
		Self::new(100)
	}
}

#[component]
pub fn LogPanel(#[prop(into)] buffer: Signal<LogBuffer>) -> impl IntoView {
	let rows = move || {
		buffer.with(|b| {
			b.entries()
				.map(|(seq, line)| (seq, line.to_string()))
				.collect::<Vec<_>>()
		})
	};
	view! {
		<section class="sfa-panel sfa-logs">
			<h2>"Live logs"</h2>
			<div id="log-stream" class="sfa-log-stream">
				<For
					each=rows
					key=|(seq, _)| *seq
					children=|(_, line)| view! { <div class="sfa-log-line">{line}</div> }
				/>
			</div>
		</section>
	}
}
