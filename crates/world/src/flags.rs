bitflags::bitflags! {
	/// Side effects requested when a block value is written.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct SetFlags: u32 {
		/// Notify neighboring blocks of the change.
		const UPDATE_NEIGHBORS = 1 << 0;
		/// Send the change to observing clients.
		const UPDATE_CLIENTS = 1 << 1;
		/// Suppress client-side re-rendering.
		const UPDATE_INVISIBLE = 1 << 2;
		/// Re-render on the main thread immediately.
		const UPDATE_IMMEDIATE = 1 << 3;
	}
}

impl SetFlags {
	/// Neighbor updates plus client sync.
	pub const ALL: Self = Self::UPDATE_NEIGHBORS.union(Self::UPDATE_CLIENTS);

	/// Whether clients will see the write.
	pub const fn renders(self) -> bool {
		self.contains(Self::UPDATE_CLIENTS) && !self.contains(Self::UPDATE_INVISIBLE)
	}
}

#[cfg(test)]
mod tests {
	use super::SetFlags;

	#[test]
	fn fill_flags_render_without_forcing() {
		let flags = SetFlags::UPDATE_CLIENTS;
		assert!(flags.renders());
		assert!(!flags.contains(SetFlags::UPDATE_IMMEDIATE));
		assert!(!(flags | SetFlags::UPDATE_INVISIBLE).renders());
		assert_eq!(SetFlags::ALL.bits(), 3);
	}
}
