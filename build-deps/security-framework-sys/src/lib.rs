// Intentionally empty. See the sibling security-framework stub.
