//! Cross-module scenarios: grid queries feeding snap
