//! Unit tests mirroring the `src/` module tree one file per module

mod spatial;
