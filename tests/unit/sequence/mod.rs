mod temporal;
