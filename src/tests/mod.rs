// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

mod integration_tests;
mod synth_tests;
