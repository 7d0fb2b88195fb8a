#[cfg(test)]
mod probe_loop;
