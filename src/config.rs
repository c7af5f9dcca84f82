// config.rs: Compile-time configuration constants.
//
// The decode core itself has no tunables; these govern how the file layer
// sizes destination buffers when a stream does not declare its decoded size.

// Initial destination capacity as a multiple of the compressed size, used
// when `decoded_size_hint` cannot walk the stream.
pub const EXPANSION_RATIO_DEFAULT: usize = 4;

// Smallest destination capacity tried, regardless of input size.
pub const MIN_OUTPUT_CAPACITY: usize = 64 * 1024;

// Upper bound on destination capacity, overridable with `--max-size`.
// Kernel caches decode to a few hundred MiB; 2 GiB leaves headroom.
pub const MAX_OUTPUT_SIZE_DEFAULT: usize = 2 << 30;
