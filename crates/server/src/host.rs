// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Host discovery hooks: the local hostname and the CPU/OS pair for HINFO

use std::ffi::CStr;
use std::io;

/// CPU and operating system of the local host, as served in HINFO answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// The machine hardware name, e.g. `x86_64`
    pub cpu: String,
    /// The operating system name, e.g. `Linux`
    pub os: String,
}

/// Returns the hostname of the local host
pub fn local_hostname() -> io::Result<String> {
    // HOST_NAME_MAX is 64 on Linux, one extra byte for the terminator
    let mut buf = [0_i8 as libc::c_char; 65];

    let rc = unsafe { libc::gethostname(buf.as_mut_ptr(), buf.len() - 1) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    let hostname = unsafe { CStr::from_ptr(buf.as_ptr()) };

    Ok(hostname.to_string_lossy().into_owned())
}

/// Returns the CPU and OS strings of the local host, from `uname(2)`
pub fn host_info() -> io::Result<HostInfo> {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };

    let rc = unsafe { libc::uname(&mut uts) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    let cpu = unsafe { CStr::from_ptr(uts.machine.as_ptr()) };
    let os = unsafe { CStr::from_ptr(uts.sysname.as_ptr()) };

    Ok(HostInfo {
        cpu: cpu.to_string_lossy().into_owned(),
        os: os.to_string_lossy().into_owned(),
    })
}
