// Intentionally empty. macOS-only resolution stub; never compiled on Linux.
