// Intentionally empty. This crate only exists to satisfy dependency
// resolution for native-tls on macOS/iOS targets, where the real
// security-framework 0.1.x versions are all yanked upstream. It is
// target-gated out of every build on non-Apple platforms.
