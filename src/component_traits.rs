// License: MIT
// Copyright © 2024 esm-metrics contributors

//! This module contains the traits that need to be implemented by the types
//! that represent the components and networks of a solved model.

/**
This trait needs to be implemented by the type that represents a branch
component, i.e. a line, link or transformer connecting two or more buses.

Read more about why this is necessary [here][crate#the-component-and-network-traits].

<details>
<summary>Example implementation for a row of a link table:</summary>

```
use std::collections::HashMap;

struct Link {
    buses: HashMap<String, String>,
}

impl esm_metrics::Component for Link {
    fn bus(&self, port: &str) -> Option<&str> {
        self.buses.get(port).map(String::as_str)
    }
}
```

</details>
*/
pub trait Component {
    /// Returns the name of the bus connected at `port`, e.g. `"bus0"`, or
    /// `None` if the component has no such port.
    fn bus(&self, port: &str) -> Option<&str>;
}

/**
This trait needs to be implemented by the type that represents a solved
network of one planning period.

The metadata is the configuration the network was built and solved with.

<details>
<summary>Example implementation:</summary>

```
struct Network {
    meta: serde_json::Value,
}

impl esm_metrics::Network for Network {
    fn meta(&self) -> &serde_json::Value {
        &self.meta
    }
}
```

</details>
*/
pub trait Network {
    /// Returns the metadata map of the network.
    fn meta(&self) -> &serde_json::Value;
}
